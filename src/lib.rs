//! espgpt: a pocket question-answering assistant.
//!
//! A question is matched against a small keyword knowledge base, the best
//! fact is folded into a prompt, and the prompt is answered by a remote
//! completion API behind a fixed-size LRU response cache.
//!
//! ```rust,ignore
//! use espgpt::{Assistant, Config};
//!
//! let config = Config::load()?;
//! let assistant = Assistant::from_config(&config)?;
//! let answer = assistant.ask("What is an ESP32?").await?;
//! println!("{}", answer.text);
//! ```

pub mod api;
pub mod assistant;
pub mod cache;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod providers;

pub use assistant::{Answer, Assistant};
pub use cache::{CacheStats, ResponseCache};
pub use config::Config;
pub use error::{EspGptError, Result};
pub use knowledge::{KnowledgeEntry, KnowledgeMatcher};
pub use providers::{CompletionProvider, OpenAiProvider, RemoteError};
