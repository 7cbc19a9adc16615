use std::process::ExitCode;

use pyproject_convert::main as pyproject_convert_main;

fn main() -> ExitCode {
    pyproject_convert_main(std::env::args_os())
}
