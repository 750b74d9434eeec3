//! Keyword-overlap matcher over a small in-memory knowledge base.
//!
//! Each entry carries a keyword string, a content string, and an importance
//! weight. A query is scored against every entry by counting how many query
//! words occur as a substring of the entry's keyword string (case-insensitive),
//! multiplied by the entry's importance. The matcher is a deliberate linear
//! scan: it holds tens of curated facts, not a corpus.

use tracing::debug;

use crate::error::{EspGptError, Result};

/// A single keyword-tagged fact.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    keywords: Vec<String>,
    /// Lower-cased, space-joined keywords used for substring matching.
    haystack: String,
    content: String,
    importance: f32,
}

impl KnowledgeEntry {
    /// Build an entry from a whitespace-separated keyword string.
    ///
    /// # Errors
    ///
    /// Returns [`EspGptError::Knowledge`] when `importance` is negative,
    /// NaN, or infinite.
    pub fn new(keywords: &str, content: impl Into<String>, importance: f32) -> Result<Self> {
        if !importance.is_finite() || importance < 0.0 {
            return Err(EspGptError::Knowledge(format!(
                "importance must be a finite number >= 0, got {importance}"
            )));
        }
        let keywords: Vec<String> = keywords.split_whitespace().map(String::from).collect();
        let haystack = keywords.join(" ").to_lowercase();
        Ok(Self {
            keywords,
            haystack,
            content: content.into(),
            importance,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn importance(&self) -> f32 {
        self.importance
    }

    /// Raw overlap: number of tokens contained in the keyword string.
    fn overlap(&self, tokens: &[String]) -> usize {
        tokens
            .iter()
            .filter(|t| self.haystack.contains(t.as_str()))
            .count()
    }

    /// Weighted score for an already-tokenized query.
    pub fn score(&self, tokens: &[String]) -> f32 {
        self.overlap(tokens) as f32 * self.importance
    }
}

/// Result of a best-match search.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMatch<'a> {
    /// Insertion index of the winning entry.
    pub index: usize,
    pub entry: &'a KnowledgeEntry,
    pub score: f32,
}

/// In-memory knowledge base with keyword-overlap retrieval.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeMatcher {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeMatcher {
    /// Create an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher pre-populated with `entries`, in order.
    pub fn with_entries(entries: impl IntoIterator<Item = KnowledgeEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Append a new entry. Keywords need not be unique across entries.
    pub fn add_entry(
        &mut self,
        keywords: &str,
        content: impl Into<String>,
        importance: f32,
    ) -> Result<()> {
        self.push(KnowledgeEntry::new(keywords, content, importance)?);
        Ok(())
    }

    /// Append an already-built entry.
    pub fn push(&mut self, entry: KnowledgeEntry) {
        self.entries.push(entry);
    }

    /// Replace the entry at `index`, keeping its position (and tie priority).
    pub fn replace_entry(&mut self, index: usize, entry: KnowledgeEntry) -> Result<()> {
        let len = self.entries.len();
        let slot = self.entries.get_mut(index).ok_or_else(|| {
            EspGptError::Knowledge(format!("entry index {index} out of bounds (len {len})"))
        })?;
        *slot = entry;
        Ok(())
    }

    /// Return the content of the best-matching entry for `query`.
    ///
    /// Ties go to the earliest inserted entry. When nothing overlaps, every
    /// entry scores zero and the first entry is returned.
    ///
    /// # Errors
    ///
    /// Returns [`EspGptError::EmptyKnowledgeBase`] if no entries exist.
    pub fn best_match(&self, query: &str) -> Result<&str> {
        self.best_match_entry(query).map(|m| m.entry.content())
    }

    /// Same search as [`best_match`](Self::best_match), returning the winning
    /// entry together with its index and score.
    pub fn best_match_entry(&self, query: &str) -> Result<ScoredMatch<'_>> {
        let tokens = tokenize(query);
        let mut best: Option<ScoredMatch<'_>> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            let score = entry.score(&tokens);
            // Strictly greater: earlier entries keep ties.
            if best.is_none_or(|b| score > b.score) {
                best = Some(ScoredMatch {
                    index,
                    entry,
                    score,
                });
            }
        }
        let best = best.ok_or(EspGptError::EmptyKnowledgeBase)?;
        debug!(
            index = best.index,
            score = best.score,
            tokens = tokens.len(),
            "Knowledge match selected"
        );
        Ok(best)
    }

    /// Content of the entry at `index`, if any.
    pub fn content(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(KnowledgeEntry::content)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower-case the query and split on single spaces, dropping empty tokens
/// produced by repeated spaces.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
