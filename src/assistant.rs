//! Question-answering core: knowledge lookup, prompt composition, cached
//! remote completion.
//!
//! One [`Assistant`] is built at startup and shared (via `Arc`) by every
//! request handler. The knowledge base is read-only after construction; the
//! response cache sits behind a mutex that is held only for a single `get`
//! or `put`, never across the remote call.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ResponseCache};
use crate::config::Config;
use crate::error::Result;
use crate::knowledge::KnowledgeMatcher;
use crate::providers::{CompletionProvider, OpenAiProvider};

/// Formatting instructions appended to every prompt so the chat page can
/// render code blocks.
const FORMAT_INSTRUCTIONS: &str = "When providing code examples, please format them using markdown code blocks with language specifiers, like:\n\
```javascript\n// Your JavaScript code here\n```\n\
```cpp\n// Your C++ code here\n```\n\
For inline code, use backticks like `this`.\n\n";

/// An answer and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    /// Knowledge base content used as context.
    pub context: String,
    /// Whether the answer came from the response cache.
    pub cached: bool,
}

/// Owns the knowledge base, the response cache, and the remote provider.
pub struct Assistant {
    knowledge: KnowledgeMatcher,
    cache: Mutex<ResponseCache>,
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
}

impl Assistant {
    pub fn new(
        knowledge: KnowledgeMatcher,
        cache: ResponseCache,
        provider: Arc<dyn CompletionProvider>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            knowledge,
            cache: Mutex::new(cache),
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    /// Build the assistant described by `config`, talking to OpenAI.
    pub fn from_config(config: &Config) -> Result<Self> {
        let knowledge = config.knowledge.build_matcher()?;
        let provider = OpenAiProvider::from_config(&config.provider)?;
        info!(
            entries = knowledge.len(),
            cache_capacity = config.cache.capacity,
            model = %provider.model(),
            "Assistant ready"
        );
        Ok(Self::new(
            knowledge,
            ResponseCache::new(config.cache.capacity),
            Arc::new(provider),
            config.provider.system_prompt.clone(),
        ))
    }

    /// Compose the prompt sent to the remote model.
    pub fn compose_prompt(context: &str, question: &str) -> String {
        format!(
            "Context information: {context}\n\nQuestion: {question}\n\n{FORMAT_INSTRUCTIONS}Answer:"
        )
    }

    /// Answer `question`.
    ///
    /// Looks up context, composes the prompt, and returns a cached answer if
    /// one exists. Otherwise calls the provider and caches a non-empty
    /// success. Remote errors are returned unchanged and never cached.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let context = self.knowledge.best_match(question)?.to_string();
        debug!(%context, "Context selected");
        let prompt = Self::compose_prompt(&context, question);

        let cached = self.lock_cache().get(&prompt);
        if let Some(text) = cached {
            info!("Using cached response");
            return Ok(Answer {
                text,
                context,
                cached: true,
            });
        }

        let text = match self.provider.complete(&prompt, &self.system_prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Completion failed");
                return Err(e.into());
            }
        };

        if text.is_empty() {
            debug!("Empty completion, not caching");
        } else {
            self.lock_cache().put(prompt, text.clone());
        }

        Ok(Answer {
            text,
            context,
            cached: false,
        })
    }

    pub fn knowledge(&self) -> &KnowledgeMatcher {
        &self.knowledge
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().expect("response cache lock poisoned")
    }
}
