use crate::common::{TestContext, convert_command};

const PYPROJECT: &str = "[project]\nname = \"demo\"\ndependencies = [\"click\"]\n";

#[test]
fn quiet_suppresses_success_message() {
    let context = TestContext::new(PYPROJECT);
    let mut cmd = context.command(convert_command());
    cmd.args(["--quiet", "pip-to-poetry", "-i", "pyproject.toml", "-o", "out.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(
        stderr.is_empty(),
        "Expected no output with --quiet, got: {stderr}"
    );
    assert!(context.path("out.toml").exists());
}

#[test]
fn quiet_still_reports_errors() {
    let context = TestContext::new("[tool.poetry]\nname = \"demo\"\n");
    let mut cmd = context.command(convert_command());
    cmd.args(["-q", "pip-to-poetry", "-i", "pyproject.toml", "-o", "out.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("missing `[project]` table"), "got: {stderr}");
}

#[test]
fn verbose_shows_debug_logs() {
    let context = TestContext::new(PYPROJECT);
    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-v", "-i", "pyproject.toml", "-o", "out.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stderr.contains("Reading `pyproject.toml`"), "got: {stderr}");
    assert!(stderr.contains("Successfully converted"), "got: {stderr}");
}

#[test]
fn double_verbose_accepted() {
    let context = TestContext::new(PYPROJECT);
    let mut cmd = context.command(convert_command());
    cmd.args(["-vv", "pip-to-poetry", "-i", "pyproject.toml", "-o", "out.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");

    assert!(output.status.success());
}
