use crate::common::{convert_command, poetry_to_pip_command};

#[test]
fn version_flag_shows_version() {
    let mut cmd = convert_command();
    cmd.arg("--version");

    let output = cmd.output().expect("Failed to execute pyproject-convert");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.starts_with("pyproject-convert "),
        "Expected version string starting with 'pyproject-convert ', got: {stdout}"
    );
}

#[test]
fn standalone_binary_version() {
    let mut cmd = poetry_to_pip_command();
    cmd.arg("-V");

    let output = cmd.output().expect("Failed to execute poetry-to-pip");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.starts_with("poetry-to-pip "),
        "Expected version string starting with 'poetry-to-pip ', got: {stdout}"
    );
}
