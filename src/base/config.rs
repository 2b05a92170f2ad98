//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::{retry::RetryPolicy, types::Res};

/// Default OpenAI model to use for extraction.
fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Default location of the extraction prompt, relative to the working directory.
fn default_prompt_path() -> String {
    "prompts/extraction/default.txt".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_extraction_max_attempts() -> u32 {
    3
}

fn default_extraction_backoff_base_secs() -> u64 {
    4
}

fn default_extraction_backoff_max_secs() -> u64 {
    10
}

fn default_extraction_timeout_secs() -> u64 {
    30
}

/// Configuration for the comment-digest application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// OpenAI API key (`COMMENT_DIGEST_OPENAI_API_KEY`, or plain `OPENAI_API_KEY`).
    #[serde(default)]
    pub openai_api_key: String,
    /// OpenAI model used for extraction (`COMMENT_DIGEST_OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Path to the extraction prompt template (`COMMENT_DIGEST_PROMPT_PATH`).
    #[serde(default = "default_prompt_path")]
    pub prompt_path: String,
    /// Address the HTTP server binds to (`COMMENT_DIGEST_BIND_ADDRESS`).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Total attempts per extraction, including the first (`COMMENT_DIGEST_EXTRACTION_MAX_ATTEMPTS`).
    #[serde(default = "default_extraction_max_attempts")]
    pub extraction_max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry (`COMMENT_DIGEST_EXTRACTION_BACKOFF_BASE_SECS`).
    #[serde(default = "default_extraction_backoff_base_secs")]
    pub extraction_backoff_base_secs: u64,
    /// Upper bound on the delay between attempts (`COMMENT_DIGEST_EXTRACTION_BACKOFF_MAX_SECS`).
    #[serde(default = "default_extraction_backoff_max_secs")]
    pub extraction_backoff_max_secs: u64,
    /// Timeout for a single attempt (`COMMENT_DIGEST_EXTRACTION_TIMEOUT_SECS`).
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_model: default_openai_model(),
            prompt_path: default_prompt_path(),
            bind_address: default_bind_address(),
            extraction_max_attempts: default_extraction_max_attempts(),
            extraction_backoff_base_secs: default_extraction_backoff_base_secs(),
            extraction_backoff_max_secs: default_extraction_backoff_max_secs(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
        }
    }
}

impl Config {
    /// Load the configuration: the TOML file (if any), overlaid by `COMMENT_DIGEST_*` variables.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Later sources win.
        cfg = cfg.add_source(config::Environment::default().prefix("COMMENT_DIGEST").try_parsing(true));

        let mut inner: ConfigInner = cfg.build()?.try_deserialize()?;

        if inner.openai_api_key.is_empty() {
            inner.openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        }

        if inner.openai_api_key.is_empty() {
            return Err(anyhow::anyhow!("OpenAI API key must be set (`OPENAI_API_KEY` or `COMMENT_DIGEST_OPENAI_API_KEY`)."));
        }

        let result = Config { inner: Arc::new(inner) };
        result.validate()?;

        Ok(result)
    }

    /// Check the extraction settings for consistency.
    pub fn validate(&self) -> Res<()> {
        if self.extraction_max_attempts < 1 {
            return Err(anyhow::anyhow!("Extraction max attempts must be at least 1."));
        }

        if self.extraction_backoff_base_secs > self.extraction_backoff_max_secs {
            return Err(anyhow::anyhow!("Extraction backoff base must not exceed the backoff max."));
        }

        if self.extraction_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Extraction timeout must be at least 1 second."));
        }

        Ok(())
    }

    /// The retry policy for extraction calls described by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.extraction_max_attempts,
            base_delay: Duration::from_secs(self.extraction_backoff_base_secs),
            max_delay: Duration::from_secs(self.extraction_backoff_max_secs),
            attempt_timeout: Duration::from_secs(self.extraction_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(inner: ConfigInner) -> Config {
        Config { inner: Arc::new(inner) }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = config_with(ConfigInner::default());

        assert!(config.validate().is_ok());
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.prompt_path, "prompts/extraction/default.txt");
    }

    // Environment variables are process-wide, so every `load` scenario lives in this one test.
    #[test]
    fn test_load_env_overrides_file_and_key_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "openai_model = \"file-model\"\nprompt_path = \"file-prompt.txt\"\nextraction_timeout_secs = 12\n").unwrap();

        // SAFETY: no other test reads or writes these variables.
        unsafe {
            std::env::set_var("COMMENT_DIGEST_OPENAI_MODEL", "env-model");
            std::env::remove_var("COMMENT_DIGEST_OPENAI_API_KEY");
            std::env::set_var("OPENAI_API_KEY", "sk-from-plain-env");
        }

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.openai_model, "env-model");
        assert_eq!(config.prompt_path, "file-prompt.txt");
        assert_eq!(config.extraction_timeout_secs, 12);
        assert_eq!(config.openai_api_key, "sk-from-plain-env");

        // SAFETY: as above.
        unsafe {
            std::env::set_var("COMMENT_DIGEST_OPENAI_API_KEY", "sk-prefixed");
        }

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.openai_api_key, "sk-prefixed");

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("COMMENT_DIGEST_OPENAI_API_KEY");
            std::env::remove_var("OPENAI_API_KEY");
        }

        assert!(Config::load(Some(&path)).is_err(), "A missing API key should be rejected");

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("COMMENT_DIGEST_OPENAI_MODEL");
        }
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = config_with(ConfigInner::default()).retry_policy();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(4));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = config_with(ConfigInner {
            extraction_max_attempts: 0,
            ..Default::default()
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_backoff_rejected() {
        let config = config_with(ConfigInner {
            extraction_backoff_base_secs: 20,
            extraction_backoff_max_secs: 10,
            ..Default::default()
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = config_with(ConfigInner {
            extraction_timeout_secs: 0,
            ..Default::default()
        });

        assert!(config.validate().is_err());
    }
}
