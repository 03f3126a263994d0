//! Load and validate runtime configuration.

use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuotesCfg {
    pub base_url: String,
    /// Name of the env var holding the provider API key. The provider's
    /// public "demo" key is used when the var is unset.
    pub api_key_env: String,
}

impl Default for QuotesCfg {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co/query".to_string(),
            api_key_env: "ALPHAVANTAGE_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ViewCfg {
    /// "symbol" | "name" | "price" | "change" | "value"
    pub sort_by: String,
    pub search: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RefreshCfg {
    /// Re-fetch quotes every N seconds; one-shot when unset.
    pub interval_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub quotes: QuotesCfg,
    pub view: ViewCfg,
    pub refresh: RefreshCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&s)?;
        Ok(cfg)
    }

    /// Defaults when no config file is present.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn api_key(&self) -> String {
        std::env::var(&self.quotes.api_key_env).unwrap_or_else(|_| "demo".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_missing_file() {
        let cfg = AppConfig::load_or_default("/no/such/config.yaml").unwrap();
        assert_eq!(cfg.quotes.base_url, "https://www.alphavantage.co/query");
        assert!(cfg.refresh.interval_sec.is_none());
        assert!(cfg.view.search.is_empty());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let cfg: AppConfig = serde_yaml::from_str("view:\n  sort_by: price\n").unwrap();
        assert_eq!(cfg.view.sort_by, "price");
        assert_eq!(cfg.quotes.api_key_env, "ALPHAVANTAGE_API_KEY");
    }
}
