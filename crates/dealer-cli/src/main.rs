//! Dealer CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use dealer_cli::{EnvVars, PlatformBootstrap, Shell};

fn main() -> ExitCode {
    let shell = Shell::new(PlatformBootstrap::new(EnvVars::from_process()));
    let code = shell.run(std::env::args_os(), &mut io::stdout(), &mut io::stderr());
    ExitCode::from(code)
}
