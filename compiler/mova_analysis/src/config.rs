//! Session configuration.
//!
//! Editors send settings as JSON; every field is optional and falls back to
//! its default. Environment variables override whatever was loaded:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MOVA_CACHE_MAX_ENTRIES` | `cache.max_entries` |
//! | `MOVA_CACHE_LOW_WATERMARK` | `cache.low_watermark_percent` |
//! | `MOVA_MAX_INFER_DEPTH` | `infer.max_depth` |
//! | `MOVA_PARALLEL` | `parallel` |

use std::str::FromStr;

use mova_cache::CacheConfig;
use mova_infer::InferConfig;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_CACHE_MAX_ENTRIES: &str = "MOVA_CACHE_MAX_ENTRIES";
pub const ENV_CACHE_LOW_WATERMARK: &str = "MOVA_CACHE_LOW_WATERMARK";
pub const ENV_MAX_INFER_DEPTH: &str = "MOVA_MAX_INFER_DEPTH";
pub const ENV_PARALLEL: &str = "MOVA_PARALLEL";

/// Settings that could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{var}` must be {expected}, got `{value}`")]
    Env {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Everything an [`AnalysisHost`](crate::AnalysisHost) can be tuned with.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub cache: CacheConfig,
    pub infer: InferConfig,
    /// Run batch inference on a thread pool.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            cache: CacheConfig::default(),
            infer: InferConfig::default(),
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse editor settings, then validate them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the process environment applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup` (normally the environment), then
    /// validate the result.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(n) = parse_var(&lookup, ENV_CACHE_MAX_ENTRIES, "an entry count")? {
            self.cache.max_entries = n;
        }
        if let Some(n) = parse_var(&lookup, ENV_CACHE_LOW_WATERMARK, "a percentage")? {
            self.cache.low_watermark_percent = n;
        }
        if let Some(n) = parse_var(&lookup, ENV_MAX_INFER_DEPTH, "a depth")? {
            self.infer.max_depth = n;
        }
        if let Some(value) = lookup(ENV_PARALLEL) {
            self.parallel = parse_flag(&value).ok_or(ConfigError::Env {
                var: ENV_PARALLEL,
                value,
                expected: "a flag",
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache.max_entries",
                reason: "must be at least 1",
            });
        }
        if self.cache.low_watermark_percent > 100 {
            return Err(ConfigError::Invalid {
                field: "cache.low_watermark_percent",
                reason: "must be at most 100",
            });
        }
        if self.infer.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "infer.max_depth",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::Env {
            var,
            value,
            expected,
        }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
