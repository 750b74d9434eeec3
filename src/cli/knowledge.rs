//! `espgpt knowledge` command handler.

use anyhow::Result;

use espgpt::{Config, KnowledgeMatcher};

/// List the configured knowledge base, or show which entry a query selects.
pub(crate) fn cmd_knowledge(config: &Config, query: Option<&str>) -> Result<()> {
    let matcher = config.knowledge.build_matcher()?;
    match query {
        Some(q) => print!("{}", format_match(&matcher, q)?),
        None => print!("{}", format_entries(&matcher)),
    }
    Ok(())
}

fn format_entries(matcher: &KnowledgeMatcher) -> String {
    if matcher.is_empty() {
        return "Knowledge base is empty.\n".to_string();
    }
    let mut out = format!("{:<4} {:<8} {:<40} {}\n", "#", "Weight", "Keywords", "Content");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for (i, entry) in matcher.entries().iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<8.2} {:<40} {}\n",
            i,
            entry.importance(),
            entry.keywords().join(" "),
            entry.content()
        ));
    }
    out
}

fn format_match(matcher: &KnowledgeMatcher, query: &str) -> Result<String> {
    let hit = matcher.best_match_entry(query)?;
    Ok(format!(
        "Best match: #{} (score {:.2})\n{}\n",
        hit.index,
        hit.score,
        hit.entry.content()
    ))
}
