//! Keyword-tagged knowledge base used as retrieval context for prompts.

pub mod matcher;

pub use matcher::{tokenize, KnowledgeEntry, KnowledgeMatcher, ScoredMatch};
