use std::process::ExitCode;

use pyproject_convert::commands::Direction;
use pyproject_convert::convert_main;

fn main() -> ExitCode {
    convert_main(Direction::PoetryToPip, std::env::args_os())
}
