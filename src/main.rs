use std::process::ExitCode;

use api_token_issuer::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::CreateApiToken(args) => cli::create_token::run(args).await,
        Command::Migrate => cli::migrate::run().await,
    }
}
