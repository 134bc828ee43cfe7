use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CapabilityTier, PatternError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierModels {
    pub light: String,
    pub standard: String,
}

impl TierModels {
    pub fn model_for(&self, tier: CapabilityTier) -> &str {
        match tier {
            CapabilityTier::Light => &self.light,
            CapabilityTier::Standard => &self.standard,
        }
    }
}

impl Default for TierModels {
    fn default() -> Self {
        Self {
            light: "gpt-4o-mini".to_string(),
            standard: "gpt-4o".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternsConfig {
    #[serde(default)]
    pub models: TierModels,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_concurrent_workers")]
    pub max_concurrent_workers: usize,
}

fn default_timeout_secs() -> u64 {
    60
}

/// Worker calls in flight at once unless configured otherwise.
pub const DEFAULT_MAX_CONCURRENT_WORKERS: usize = 4;

fn default_max_concurrent_workers() -> usize {
    DEFAULT_MAX_CONCURRENT_WORKERS
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            models: TierModels::default(),
            api_base: None,
            timeout_secs: default_timeout_secs(),
            max_concurrent_workers: default_max_concurrent_workers(),
        }
    }
}

impl PatternsConfig {
    /// Defaults overlaid with `PATTERNS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(model) = lookup("PATTERNS_LIGHT_MODEL") {
            config.models.light = model;
        }
        if let Some(model) = lookup("PATTERNS_STANDARD_MODEL") {
            config.models.standard = model;
        }
        if let Some(base) = lookup("PATTERNS_API_BASE") {
            config.api_base = Some(base);
        }
        if let Some(raw) = lookup("PATTERNS_TIMEOUT_SECS") {
            config.timeout_secs = parse_number("PATTERNS_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("PATTERNS_MAX_WORKERS") {
            config.max_concurrent_workers = parse_number("PATTERNS_MAX_WORKERS", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(PatternError::Config("timeout_secs must be greater than zero".into()));
        }
        if self.max_concurrent_workers == 0 {
            return Err(PatternError::Config(
                "max_concurrent_workers must be greater than zero".into(),
            ));
        }
        if self.models.light.trim().is_empty() || self.models.standard.trim().is_empty() {
            return Err(PatternError::Config("model names must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| PatternError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PatternsConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PatternsConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.models.model_for(CapabilityTier::Light), "gpt-4o-mini");
    }

    #[test]
    fn test_env_overrides() {
        let config = PatternsConfig::from_lookup(lookup(&[
            ("PATTERNS_LIGHT_MODEL", "small"),
            ("PATTERNS_STANDARD_MODEL", "large"),
            ("PATTERNS_API_BASE", "http://localhost:11434/v1"),
            ("PATTERNS_TIMEOUT_SECS", "5"),
            ("PATTERNS_MAX_WORKERS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.models.model_for(CapabilityTier::Standard), "large");
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_concurrent_workers, 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PatternsConfig::from_lookup(lookup(&[("PATTERNS_TIMEOUT_SECS", "soon")])).is_err());
        assert!(PatternsConfig::from_lookup(lookup(&[("PATTERNS_MAX_WORKERS", "0")])).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PatternsConfig = serde_json::from_str(r#"{"timeout_secs": 10}"#).unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_concurrent_workers, DEFAULT_MAX_CONCURRENT_WORKERS);
        assert_eq!(config.models, TierModels::default());
    }
}
