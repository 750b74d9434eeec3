//! Configuration for espgpt.
//!
//! Loaded from `~/.espgpt/config.json` (or an explicit path). Every section
//! is `#[serde(default)]`, so a partial file only overrides what it names and
//! a missing file yields the built-in defaults. Environment variables are
//! applied on top of the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{EspGptError, Result};
use crate::knowledge::{KnowledgeEntry, KnowledgeMatcher};
use crate::providers::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ESPGPT_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub provider: ProviderConfig,
    pub knowledge: KnowledgeConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0).
    pub bind: String,
    /// Listen port (default: 80).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached answers. Must be positive.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Remote completion provider settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// System prompt sent with every completion request.
    pub system_prompt: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("system_prompt", &self.system_prompt)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 15,
        }
    }
}

/// One knowledge base seed entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSeed {
    /// Whitespace-separated keywords.
    pub keywords: String,
    pub content: String,
    #[serde(default = "default_importance")]
    pub importance: f32,
}

fn default_importance() -> f32 {
    1.0
}

impl KnowledgeSeed {
    fn new(keywords: &str, content: &str, importance: f32) -> Self {
        Self {
            keywords: keywords.to_string(),
            content: content.to_string(),
            importance,
        }
    }
}

/// Knowledge base seed list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub entries: Vec<KnowledgeSeed>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            entries: vec![
                KnowledgeSeed::new(
                    "AI artificial intelligence",
                    "AI stands for Artificial Intelligence.",
                    1.0,
                ),
                KnowledgeSeed::new(
                    "ESP32 microcontroller wifi bluetooth",
                    "ESP32 is a microcontroller with WiFi and Bluetooth capabilities.",
                    1.0,
                ),
                KnowledgeSeed::new(
                    "Arduino Italy developers",
                    "Arduino was created by developers in Italy.",
                    1.0,
                ),
                KnowledgeSeed::new(
                    "ESP32 features capabilities specs",
                    "The ESP32 is a powerful microcontroller with dual-core processor, WiFi, Bluetooth, and extensive GPIO capabilities.",
                    1.2,
                ),
                KnowledgeSeed::new(
                    "PlatformIO IDE development environment",
                    "PlatformIO is a cross-platform IDE and unified debugger that supports many development boards including ESP32.",
                    1.0,
                ),
                KnowledgeSeed::new(
                    "Arduino framework programming",
                    "The Arduino framework provides a simple and accessible way to program microcontrollers with C/C++.",
                    1.0,
                ),
            ],
        }
    }
}

impl KnowledgeConfig {
    /// Build a matcher from the seed list, preserving order.
    pub fn build_matcher(&self) -> Result<KnowledgeMatcher> {
        let entries = self
            .entries
            .iter()
            .map(|s| KnowledgeEntry::new(&s.keywords, s.content.clone(), s.importance))
            .collect::<Result<Vec<_>>>()?;
        Ok(KnowledgeMatcher::with_entries(entries))
    }
}

impl Config {
    /// Directory holding espgpt state (`~/.espgpt`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".espgpt")
    }

    /// Default config file path, honoring `ESPGPT_CONFIG`.
    pub fn path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::dir().join("config.json"))
    }

    /// Load from the default path, apply env overrides, and validate.
    pub fn load() -> Result<Self> {
        Self::load_with_env(&Self::path())
    }

    /// Load from `path`, apply env overrides, and validate.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_path(path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the file at `path`. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => {
                let config: Self = serde_json::from_str(&data).map_err(|e| {
                    EspGptError::Config(format!("{}: {}", path.display(), e))
                })?;
                info!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment overrides. `lookup` abstracts `std::env::var` so
    /// tests need not touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("ESPGPT_BIND") {
            self.server.bind = bind;
        }
        if let Some(port) = lookup("ESPGPT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| EspGptError::Config(format!("ESPGPT_PORT is not a port: {port}")))?;
        }
        if let Some(capacity) = lookup("ESPGPT_CACHE_CAPACITY") {
            self.cache.capacity = capacity.parse().map_err(|_| {
                EspGptError::Config(format!(
                    "ESPGPT_CACHE_CAPACITY is not a number: {capacity}"
                ))
            })?;
        }
        if let Some(model) = lookup("ESPGPT_MODEL") {
            self.provider.model = model;
        }
        if let Some(base_url) = lookup("ESPGPT_BASE_URL") {
            self.provider.base_url = base_url;
        }
        Ok(())
    }

    /// Reject configurations the core cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(EspGptError::Config(
                "cache.capacity must be a positive integer".into(),
            ));
        }
        if self.provider.model.trim().is_empty() {
            return Err(EspGptError::Config("provider.model must not be empty".into()));
        }
        for (i, seed) in self.knowledge.entries.iter().enumerate() {
            if !seed.importance.is_finite() || seed.importance < 0.0 {
                return Err(EspGptError::Config(format!(
                    "knowledge.entries[{i}].importance must be >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.server.port, 80);
        assert_eq!(cfg.cache.capacity, 5);
        assert_eq!(cfg.provider.model, "gpt-3.5-turbo");
        assert_eq!(cfg.provider.system_prompt, "You are a helpful assistant.");
        assert_eq!(cfg.knowledge.entries.len(), 6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"server": {"port": 8080}, "cache": {"capacity": 3}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.cache.capacity, 3);
        assert_eq!(cfg.provider.request_timeout_secs, 15);
    }

    #[test]
    fn test_seed_importance_defaults_to_one() {
        let json = r#"{"knowledge": {"entries": [{"keywords": "a b", "content": "X"}]}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.knowledge.entries.len(), 1);
        assert_eq!(cfg.knowledge.entries[0].importance, 1.0);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load_from_path(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(cfg.cache.capacity, 5);
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"provider": {"model": "gpt-4o-mini"}}"#).unwrap();
        let cfg = Config::load_from_path(&path).unwrap();
        assert_eq!(cfg.provider.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_from_path_rejects_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(EspGptError::Config(_))
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut cfg = Config::default();
        cfg.cache.capacity = 0;
        assert!(matches!(cfg.validate(), Err(EspGptError::Config(_))));
    }

    #[test]
    fn test_negative_importance_rejected() {
        let mut cfg = Config::default();
        cfg.knowledge.entries[0].importance = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ESPGPT_PORT", "8081"),
            ("ESPGPT_BIND", "127.0.0.1"),
            ("ESPGPT_CACHE_CAPACITY", "9"),
            ("ESPGPT_MODEL", "gpt-4o"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.cache.capacity, 9);
        assert_eq!(cfg.provider.model, "gpt-4o");
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_override_bad_port() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_env_overrides(|k| (k == "ESPGPT_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("ESPGPT_PORT"));
    }

    #[test]
    fn test_build_matcher_preserves_order() {
        let matcher = KnowledgeConfig::default().build_matcher().unwrap();
        assert_eq!(matcher.len(), 6);
        assert_eq!(matcher.content(0), Some("AI stands for Artificial Intelligence."));
        assert_eq!(
            matcher.best_match("what are the esp32 specs").unwrap(),
            "The ESP32 is a powerful microcontroller with dual-core processor, WiFi, Bluetooth, and extensive GPIO capabilities."
        );
    }

    #[test]
    fn test_provider_config_debug_redacts_key() {
        let cfg = ProviderConfig {
            api_key: Some("sk-secret".into()),
            ..ProviderConfig::default()
        };
        assert!(!format!("{cfg:?}").contains("sk-secret"));
    }
}
