use std::process::ExitCode;

use clap::Parser;

mod platform;

fn main() -> ExitCode {
    let args = platform::cli::Args::parse();
    match platform::run_app(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("autosnap: {err:#}");
            ExitCode::from(2)
        }
    }
}
