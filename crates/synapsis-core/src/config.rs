//! Runtime configuration
//!
//! Loaded from an optional TOML file, then overridden by `SYNAPSIS_*`
//! environment variables. Every field has a default, so an empty file and no
//! file at all are both valid.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/synapsis"
//! max_maps = 500
//!
//! [llm]
//! model = "gpt-4o-mini"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override could not be parsed
    #[error("invalid value for {var}: {value:?}")]
    InvalidOverride {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynapsisConfig {
    /// Artifact and metadata storage
    pub storage: StorageConfig,
    /// Input limits
    pub limits: LimitsConfig,
    /// Generation backend
    pub llm: LlmConfig,
}

/// Artifact and metadata storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding artifacts and `metadata.json`
    pub data_dir: PathBuf,
    /// Maximum number of stored maps
    pub max_maps: usize,
    /// Maps older than this are purged
    pub retention_days: u32,
    /// Minutes between cleanup runs
    pub cleanup_interval_minutes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/mindmaps"),
            max_maps: 1000,
            retention_days: 30,
            cleanup_interval_minutes: 5,
        }
    }
}

/// Input limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum topic length in characters
    pub max_topic_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_topic_chars: 1024 }
    }
}

/// OpenAI-compatible generation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "SYNAPSIS_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl SynapsisConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = dir.into();
        self
    }

    /// With maximum stored maps
    #[inline]
    #[must_use]
    pub fn with_max_maps(mut self, max: usize) -> Self {
        self.storage.max_maps = max;
        self
    }

    /// With retention window
    #[inline]
    #[must_use]
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.storage.retention_days = days;
        self
    }

    /// With maximum topic length
    #[inline]
    #[must_use]
    pub fn with_max_topic_chars(mut self, max: usize) -> Self {
        self.limits.max_topic_chars = max;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from an optional file, then apply process environment overrides
    ///
    /// # Errors
    /// - [`ConfigError::Io`] if `path` is given but unreadable
    /// - [`ConfigError::Parse`] on malformed TOML
    /// - [`ConfigError::InvalidOverride`] on an unparsable numeric variable
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "config file loaded");
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply `SYNAPSIS_*` overrides read through `lookup`
    ///
    /// # Errors
    /// [`ConfigError::InvalidOverride`] on an unparsable numeric variable.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SYNAPSIS_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("SYNAPSIS_MAX_MAPS") {
            self.storage.max_maps = parse_override("SYNAPSIS_MAX_MAPS", value)?;
        }
        if let Some(value) = lookup("SYNAPSIS_RETENTION_DAYS") {
            self.storage.retention_days = parse_override("SYNAPSIS_RETENTION_DAYS", value)?;
        }
        if let Some(value) = lookup("SYNAPSIS_LLM_TIMEOUT") {
            self.llm.timeout_secs = parse_override("SYNAPSIS_LLM_TIMEOUT", value)?;
        }
        if let Some(model) = lookup("SYNAPSIS_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("SYNAPSIS_LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(
    var: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = SynapsisConfig::default();
        assert_eq!(config.storage.max_maps, 1000);
        assert_eq!(config.storage.retention_days, 30);
        assert_eq!(config.storage.cleanup_interval_minutes, 5);
        assert_eq!(config.limits.max_topic_chars, 1024);
        assert_eq!(config.llm.api_key_env, "SYNAPSIS_API_KEY");
        assert_eq!(config.llm.timeout_secs, 60);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let text = "[storage]\nmax_maps = 5\n\n[llm]\nmodel = \"local\"\n";
        let config = SynapsisConfig::from_toml_str(text).unwrap();
        assert_eq!(config.storage.max_maps, 5);
        assert_eq!(config.storage.retention_days, 30);
        assert_eq!(config.llm.model, "local");
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(SynapsisConfig::from_toml_str("").unwrap(), SynapsisConfig::default());
    }

    #[test]
    fn mistyped_field_is_parse_error() {
        let err = SynapsisConfig::from_toml_str("[storage]\nmax_maps = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = SynapsisConfig::new().with_max_maps(10);
        config
            .apply_overrides(env(&[
                ("SYNAPSIS_DATA_DIR", "/tmp/maps"),
                ("SYNAPSIS_MAX_MAPS", " 42 "),
                ("SYNAPSIS_LLM_MODEL", "llama3"),
            ]))
            .unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/maps"));
        assert_eq!(config.storage.max_maps, 42);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.storage.retention_days, 30);
    }

    #[test]
    fn bad_numeric_override_is_rejected() {
        let mut config = SynapsisConfig::default();
        let err = config
            .apply_overrides(env(&[("SYNAPSIS_RETENTION_DAYS", "forever")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOverride { var: "SYNAPSIS_RETENTION_DAYS", .. }
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synapsis.toml");
        std::fs::write(&path, "[limits]\nmax_topic_chars = 64\n").unwrap();

        let config = SynapsisConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.limits.max_topic_chars, 64);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = SynapsisConfig::load(Some(Path::new("/nonexistent/synapsis.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
