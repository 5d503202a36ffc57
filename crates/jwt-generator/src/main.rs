use clap::Parser;
use common::observability::{init_tracing, LogFormat};
use jwt_generator::cli::{self, Cli, DEFAULT_LOG_DIRECTIVES};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = Cli::parse();

    init_tracing(DEFAULT_LOG_DIRECTIVES, LogFormat::from_json_flag(args.json_logs));

    match cli::run(&args) {
        Ok(token) => {
            println!("Token: {token}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(stage = e.stage(), "Failed to generate token: {}", e);
            ExitCode::FAILURE
        }
    }
}
