//! Confleet CLI - fleet configuration deployment with validation and rollback

use std::process::ExitCode;

use clap::Parser;

use confleet_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
