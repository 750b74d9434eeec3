//! `espgpt ask` command handler.

use anyhow::Result;

use espgpt::{Assistant, Config};

/// Answer one question and print it to stdout.
pub(crate) async fn cmd_ask(config: &Config, question: &str) -> Result<()> {
    let assistant = Assistant::from_config(config)?;
    let answer = assistant.ask(question).await?;
    println!("{}", answer.text);
    Ok(())
}
