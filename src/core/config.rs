use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PROVIDER_URL: &str = "https://v6.exchangerate-api.com";
pub const PLACEHOLDER_API_KEY: &str = "ADD YOUR API KEY HERE";

/// Most traded currencies plus INR, in display order.
pub const DEFAULT_WATCHLIST: [&str; 11] = [
    "USD", "EUR", "JPY", "GBP", "INR", "CNY", "CHF", "AUD", "CAD", "HKD", "SGD",
];

fn default_currency() -> String {
    "INR".to_string()
}

fn default_preview_amount() -> f64 {
    10000.0
}

fn default_watchlist() -> Vec<String> {
    DEFAULT_WATCHLIST.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub api_key: String,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_preview_amount")]
    pub preview_amount: f64,
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            provider: ProviderConfig::default(),
            default_currency: default_currency(),
            preview_amount: default_preview_amount(),
            watchlist: default_watchlist(),
        }
    }
}

// Manual impl so the key never reaches the logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("provider", &self.provider)
            .field("default_currency", &self.default_currency)
            .field("preview_amount", &self.preview_amount)
            .field("watchlist", &self.watchlist)
            .finish()
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// it does not exist.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "ratewatch", "ratewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.normalize()?;
        Ok(config)
    }

    fn normalize(&mut self) -> Result<()> {
        self.default_currency = self.default_currency.trim().to_uppercase();
        for code in &mut self.watchlist {
            *code = code.trim().to_uppercase();
        }

        if self.default_currency.chars().count() != 3 {
            bail!(
                "Invalid default currency '{}': expected a 3-letter code",
                self.default_currency
            );
        }
        if self.watchlist.is_empty() {
            bail!("Watchlist must contain at least one currency");
        }
        if let Some(code) = self.watchlist.iter().find(|c| c.chars().count() != 3) {
            bail!("Invalid watchlist entry '{code}': expected a 3-letter code");
        }
        if !self.preview_amount.is_finite() {
            bail!("Preview amount must be a finite number");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
api_key: "abc123"
provider:
  base_url: "http://example.com/rates"
default_currency: "usd"
preview_amount: 250.5
watchlist:
  - eur
  - JPY
"#;

        let config = AppConfig::from_yaml(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.preview_amount, 250.5);
        assert_eq!(config.watchlist, vec!["EUR", "JPY"]);
    }

    #[test]
    fn test_config_defaults_for_missing_keys() {
        let config = AppConfig::from_yaml("api_key: \"abc123\"").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.default_currency, "INR");
        assert_eq!(config.preview_amount, 10000.0);
        assert_eq!(config.watchlist, DEFAULT_WATCHLIST.to_vec());
    }

    #[test]
    fn test_default_config_matches_builtin_values() {
        let config = AppConfig::default();
        assert_eq!(config.api_key, PLACEHOLDER_API_KEY);
        assert_eq!(config.default_currency, "INR");
        assert_eq!(config.watchlist.len(), 11);
        assert_eq!(config.watchlist[0], "USD");
        assert_eq!(config.watchlist[10], "SGD");
    }

    #[test]
    fn test_config_rejects_bad_codes() {
        let result = AppConfig::from_yaml("api_key: k\nwatchlist: [USD, EURO]");
        assert!(result.unwrap_err().to_string().contains("EURO"));

        let result = AppConfig::from_yaml("api_key: k\nwatchlist: []");
        assert!(result.is_err());

        let result = AppConfig::from_yaml("api_key: k\ndefault_currency: RUPEE");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_requires_api_key() {
        assert!(AppConfig::from_yaml("default_currency: USD").is_err());
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = AppConfig::from_yaml("api_key: \"super-secret\"").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("INR"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_key: \"from-file\"\n").unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.api_key, "from-file");

        let missing = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(
            missing
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
