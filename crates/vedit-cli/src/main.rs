//! Entry point for the `vedit` binary.
//!
//! Everything happens in [`vedit_cli::run`]; this file only hands it the
//! process arguments and standard streams.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    vedit_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
