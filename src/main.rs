//! espgpt binary entry point.

mod cli;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; a missing file is not an error.
    let _ = dotenvy::dotenv();
    let args = cli::Cli::parse();
    cli::init_logging(args.log_format);
    cli::run(args).await
}
