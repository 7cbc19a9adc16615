use indoc::indoc;
use toml::Table;

use crate::common::{
    INSTA_FILTERS, TestContext, convert_command, pip_to_poetry_command, poetry_to_pip_command,
};
use crate::convert_snapshot;

fn parse(source: &str) -> Table {
    toml::from_str(source).expect("output is valid TOML")
}

#[test]
fn pip_to_poetry_subcommand() {
    let context = TestContext::new(indoc! {r#"
        [project]
        name = "demo"
        version = "1.0.0"
        dependencies = ["requests>=2.0", "flask"]
    "#});
    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-i", "pyproject.toml", "-o", "poetry.toml"]);

    convert_snapshot!(&INSTA_FILTERS, cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----

    ----- stderr -----
    Successfully converted `pyproject.toml` to `poetry.toml`
    ");

    let output = parse(&context.read("poetry.toml"));
    let dependencies = output["tool"]["poetry"]["dependencies"].as_table().unwrap();
    assert_eq!(dependencies["requests"].as_str(), Some(">=2.0"));
    assert_eq!(dependencies["flask"].as_str(), Some("*"));
    assert_eq!(output["tool"]["poetry"]["version"].as_str(), Some("1.0.0"));
    assert!(output.get("project").is_none());
}

#[test]
fn poetry_to_pip_binary() {
    let context = TestContext::new(indoc! {r#"
        [tool.poetry]
        name = "demo"

        [tool.poetry.dependencies]
        numpy = "*"

        [tool.poetry.group.dev.dependencies]
        pytest = ">=7.0"
    "#});
    let mut cmd = context.command(poetry_to_pip_command());
    cmd.args(["--input", "pyproject.toml", "--output", "pip.toml"]);

    let output = cmd.output().expect("Failed to execute poetry-to-pip");
    assert!(output.status.success());

    let output = parse(&context.read("pip.toml"));
    let project = output["project"].as_table().unwrap();
    assert_eq!(project["dependencies"].as_array().unwrap().len(), 1);
    assert_eq!(project["dependencies"][0].as_str(), Some("numpy"));
    assert_eq!(
        project["optional-dependencies"]["dev"][0].as_str(),
        Some("pytest>=7.0")
    );
}

#[test]
fn output_may_overwrite_input() {
    let context = TestContext::new("[project]\nname = \"demo\"\ndependencies = [\"click\"]\n");
    let mut cmd = context.command(pip_to_poetry_command());
    cmd.args(["-i", "pyproject.toml", "-o", "pyproject.toml"]);

    let output = cmd.output().expect("Failed to execute pip-to-poetry");
    assert!(output.status.success());

    let output = parse(&context.read("pyproject.toml"));
    assert_eq!(
        output["tool"]["poetry"]["dependencies"]["click"].as_str(),
        Some("*")
    );
}

#[test]
fn missing_project_table() {
    let context = TestContext::new("[tool.poetry]\nname = \"demo\"\n");
    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-i", "pyproject.toml", "-o", "poetry.toml"]);

    convert_snapshot!(&INSTA_FILTERS, cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: Failed to convert `pyproject.toml`
      Caused by: missing `[project]` table
    ");

    assert!(!context.path("poetry.toml").exists());
}

#[test]
fn empty_specifier_writes_nothing() {
    let context = TestContext::new("[project]\nname = \"demo\"\ndependencies = [\"\"]\n");
    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-i", "pyproject.toml", "-o", "poetry.toml"]);

    convert_snapshot!(&INSTA_FILTERS, cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: Failed to convert `pyproject.toml`
      Caused by: invalid dependency specifier ``: specifier is empty
    ");

    assert!(!context.path("poetry.toml").exists());
}

#[test]
fn duplicate_dependency() {
    let context = TestContext::new(indoc! {r#"
        [project]
        name = "demo"
        dependencies = ["requests>=2.0", "Requests<3"]
    "#});
    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-i", "pyproject.toml", "-o", "poetry.toml"]);

    convert_snapshot!(&INSTA_FILTERS, cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: Failed to convert `pyproject.toml`
      Caused by: duplicate dependency `Requests` in `project.dependencies`
    ");
}

#[test]
fn invalid_toml_is_a_conversion_failure() {
    let context = TestContext::new("[project\nname = \"demo\"\n");
    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-i", "pyproject.toml", "-o", "poetry.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("failed to parse TOML document"), "got: {stderr}");
    assert!(!context.path("poetry.toml").exists());
}

#[test]
fn missing_input_file() {
    let context = TestContext::new("");
    let mut cmd = context.command(convert_command());
    cmd.args(["poetry-to-pip", "-i", "missing.toml", "-o", "pip.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr.starts_with("error: Failed to read `missing.toml`"),
        "got: {stderr}"
    );
    assert!(stderr.contains("Caused by"), "got: {stderr}");
}

#[test]
fn translate_constraints_flag() {
    let context = TestContext::new(indoc! {r#"
        [tool.poetry]
        name = "demo"

        [tool.poetry.dependencies]
        python = "^3.11"
        requests = "^2.31.0"
    "#});
    let mut cmd = context.command(convert_command());
    cmd.args([
        "poetry-to-pip",
        "-i",
        "pyproject.toml",
        "-o",
        "pip.toml",
        "--translate-constraints",
    ]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    assert!(output.status.success());

    let output = parse(&context.read("pip.toml"));
    assert_eq!(
        output["project"]["requires-python"].as_str(),
        Some(">=3.11,<4.0.0")
    );
    assert_eq!(
        output["project"]["dependencies"][0].as_str(),
        Some("requests>=2.31.0,<3.0.0")
    );
}

#[test]
fn python_fallback_flag() {
    let context = TestContext::new("[project]\nname = \"demo\"\n");
    let mut cmd = context.command(convert_command());
    cmd.args([
        "pip-to-poetry",
        "-i",
        "pyproject.toml",
        "-o",
        "poetry.toml",
        "--python",
        "^3.12",
    ]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    assert!(output.status.success());

    let output = parse(&context.read("poetry.toml"));
    assert_eq!(
        output["tool"]["poetry"]["dependencies"]["python"].as_str(),
        Some("^3.12")
    );
}

#[test]
fn dropped_dependency_keys_are_warned() {
    let context = TestContext::new(indoc! {r#"
        [tool.poetry]
        name = "demo"

        [tool.poetry.dependencies]
        private = { version = ">=1", source = "internal" }
        local-tool = { version = "^1.0", develop = true }
    "#});
    let mut cmd = context.command(convert_command());
    cmd.args(["poetry-to-pip", "-i", "pyproject.toml", "-o", "pip.toml"]);

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "got: {stderr}");
    assert!(
        stderr.contains(
            "`tool.poetry.dependencies.private.source` has no PEP 508 equivalent; dropping it"
        ),
        "got: {stderr}"
    );
    assert!(
        stderr.contains("`tool.poetry.dependencies.local-tool.develop` has no PEP 508 equivalent"),
        "got: {stderr}"
    );
    let output = parse(&context.read("pip.toml"));
    assert_eq!(output["project"]["dependencies"][1].as_str(), Some("private>=1"));
}

#[test]
fn bad_dependency_entry_names_the_dependency() {
    let context = TestContext::new(indoc! {r#"
        [tool.poetry]
        name = "demo"

        [tool.poetry.dependencies]
        foo = 3
    "#});
    let mut cmd = context.command(convert_command());
    cmd.args(["poetry-to-pip", "-i", "pyproject.toml", "-o", "pip.toml"]);

    convert_snapshot!(&INSTA_FILTERS, cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: Failed to convert `pyproject.toml`
      Caused by: invalid `tool.poetry.dependencies.foo`: expected a version string or a table, found integer
    ");
}

#[test]
fn git_subdirectory_round_trip() {
    let context = TestContext::new(indoc! {r#"
        [tool.poetry]
        name = "demo"

        [tool.poetry.dependencies]
        mylib = { git = "https://github.com/org/mono.git", tag = "v1", subdirectory = "pkg" }
    "#});
    let mut cmd = context.command(convert_command());
    cmd.args(["poetry-to-pip", "-i", "pyproject.toml", "-o", "pip.toml"]);
    assert!(cmd.output().expect("Failed to execute pyproject-convert").status.success());

    let mut cmd = context.command(convert_command());
    cmd.args(["pip-to-poetry", "-i", "pip.toml", "-o", "poetry.toml"]);
    assert!(cmd.output().expect("Failed to execute pyproject-convert").status.success());

    let output = parse(&context.read("poetry.toml"));
    let mylib = &output["tool"]["poetry"]["dependencies"]["mylib"];
    assert_eq!(mylib["git"].as_str(), Some("https://github.com/org/mono.git"));
    assert_eq!(mylib["rev"].as_str(), Some("v1"));
    assert_eq!(mylib["subdirectory"].as_str(), Some("pkg"));
}
