//! Engine configuration.

use std::env;

use thiserror::Error;

use crate::core::edit_block::Markers;
use crate::diff::cache::DEFAULT_DIFF_CACHE_CAPACITY;
use crate::diff::refine::DEFAULT_SIMILARITY_THRESHOLD;

pub const ENV_DIFF_CACHE: &str = "EDIT_STREAM_DIFF_CACHE";
pub const ENV_SIMILARITY: &str = "EDIT_STREAM_SIMILARITY";
pub const ENV_SPLIT: &str = "EDIT_STREAM_SPLIT";
pub const ENV_WRITE_LOG: &str = "EDIT_STREAM_WRITE_LOG";
pub const ENV_DEBUG: &str = "EDIT_STREAM_DEBUG";

/// Where the incremental renderer may commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Commit through the last blank line outside any fence or edit block.
    #[default]
    LastBlankLine,
    /// Never commit; every frame re-renders the whole message cheaply.
    Never,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidCapacity { key: &'static str, value: String },

    #[error("{key} must be a number between 0 and 1, got {value:?}")]
    InvalidThreshold { key: &'static str, value: String },

    #[error("{key} must be `blank` or `never`, got {value:?}")]
    InvalidSplitPolicy { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub diff_cache_capacity: usize,
    /// Lines pair for word-level highlighting only when similarity is strictly above this.
    pub similarity_threshold: f64,
    pub split_policy: SplitPolicy,
    pub markers: Markers,
    pub write_log: Option<String>,
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            diff_cache_capacity: DEFAULT_DIFF_CACHE_CAPACITY,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            split_policy: SplitPolicy::default(),
            markers: Markers::default(),
            write_log: None,
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Reads the environment, falling back to defaults (with a warning) on invalid values.
    pub fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(%err, "invalid engine configuration in environment; using defaults");
                Self::default()
            }
        }
    }

    pub fn try_from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = env_string_opt(ENV_DIFF_CACHE) {
            config.diff_cache_capacity = match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::InvalidCapacity {
                        key: ENV_DIFF_CACHE,
                        value,
                    })
                }
            };
        }

        if let Some(value) = env_string_opt(ENV_SIMILARITY) {
            config.similarity_threshold = match value.trim().parse::<f64>() {
                Ok(threshold) if (0.0..=1.0).contains(&threshold) => threshold,
                _ => {
                    return Err(ConfigError::InvalidThreshold {
                        key: ENV_SIMILARITY,
                        value,
                    })
                }
            };
        }

        if let Some(value) = env_string_opt(ENV_SPLIT) {
            config.split_policy = match value.trim() {
                "blank" => SplitPolicy::LastBlankLine,
                "never" => SplitPolicy::Never,
                _ => {
                    return Err(ConfigError::InvalidSplitPolicy {
                        key: ENV_SPLIT,
                        value,
                    })
                }
            };
        }

        config.write_log = env_string_opt(ENV_WRITE_LOG);
        config.debug = env_flag(ENV_DEBUG);
        Ok(config)
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.diff_cache_capacity = capacity;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_split_policy(mut self, policy: SplitPolicy) -> Self {
        self.split_policy = policy;
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, EngineConfig, SplitPolicy, ENV_DEBUG, ENV_DIFF_CACHE, ENV_SIMILARITY,
        ENV_SPLIT, ENV_WRITE_LOG,
    };
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    fn clear_all() -> Vec<EnvGuard> {
        [ENV_DIFF_CACHE, ENV_SIMILARITY, ENV_SPLIT, ENV_WRITE_LOG, ENV_DEBUG]
            .into_iter()
            .map(|key| set_env_guard(key, None))
            .collect()
    }

    #[test]
    fn env_defaults_match_default() {
        let _lock = env_lock();
        let _guards = clear_all();

        let config = EngineConfig::try_from_env().expect("defaults parse");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.diff_cache_capacity, 12);
        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.split_policy, SplitPolicy::LastBlankLine);
    }

    #[test]
    fn env_values_override_defaults() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g1 = set_env_guard(ENV_DIFF_CACHE, Some("32"));
        let _g2 = set_env_guard(ENV_SIMILARITY, Some("0.85"));
        let _g3 = set_env_guard(ENV_SPLIT, Some("never"));
        let _g4 = set_env_guard(ENV_WRITE_LOG, Some("/tmp/edit_stream.log"));
        let _g5 = set_env_guard(ENV_DEBUG, Some("1"));

        let config = EngineConfig::try_from_env().expect("valid env");
        assert_eq!(config.diff_cache_capacity, 32);
        assert_eq!(config.similarity_threshold, 0.85);
        assert_eq!(config.split_policy, SplitPolicy::Never);
        assert_eq!(config.write_log.as_deref(), Some("/tmp/edit_stream.log"));
        assert!(config.debug);
    }

    #[test]
    fn invalid_values_are_reported() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g1 = set_env_guard(ENV_SIMILARITY, Some("1.5"));

        assert_eq!(
            EngineConfig::try_from_env(),
            Err(ConfigError::InvalidThreshold {
                key: ENV_SIMILARITY,
                value: "1.5".into(),
            })
        );
        assert_eq!(EngineConfig::from_env(), EngineConfig::default());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g1 = set_env_guard(ENV_DIFF_CACHE, Some("0"));
        assert!(matches!(
            EngineConfig::try_from_env(),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn empty_write_log_is_ignored() {
        let _lock = env_lock();
        let _guards = clear_all();
        let _g1 = set_env_guard(ENV_WRITE_LOG, Some(""));
        let config = EngineConfig::from_env();
        assert!(config.write_log.is_none());
    }
}
