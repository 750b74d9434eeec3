//! Command-line interface.

mod ask;
mod knowledge;
mod serve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use espgpt::Config;

#[derive(Parser, Debug)]
#[command(name = "espgpt", version, about = "Keyword knowledge base in front of a cached LLM")]
pub struct Cli {
    /// Config file (default: ~/.espgpt/config.json or $ESPGPT_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server (default)
    Serve {
        /// Override the bind address
        #[arg(long)]
        bind: Option<String>,
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Ask a single question and print the answer
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// List knowledge base entries, or show the best match for a query
    Knowledge {
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global tracing subscriber. Logs go to stderr so `ask`
/// output on stdout stays clean.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = path.cloned().unwrap_or_else(Config::path);
    Config::load_with_env(&path).with_context(|| format!("loading {}", path.display()))
}

/// Dispatch the parsed command line.
pub async fn run(args: Cli) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    match args.command.unwrap_or(Commands::Serve {
        bind: None,
        port: None,
    }) {
        Commands::Serve { bind, port } => serve::cmd_serve(config, bind, port).await,
        Commands::Ask { question } => ask::cmd_ask(&config, &question.join(" ")).await,
        Commands::Knowledge { query } => knowledge::cmd_knowledge(&config, query.as_deref()),
    }
}
