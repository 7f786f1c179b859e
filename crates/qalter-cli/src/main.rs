//! CLI entrypoint for `qalter`.
//!
//! The binary delegates to [`qalter_cli::run`], which loads configuration,
//! validates the job options, and submits the alterations to the batch
//! servers.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    qalter_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
