//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "sampleMode": false },
//!   "display": { "currency": { "unit": "원", "position": "suffix", "groupingSeparator": "," },
//!                "defaultCategory": "Independent" },
//!   "auth": { "argon2": { "timeCost": 3, "memoryCost": 65536, "parallelism": 4, "hashLen": 32 } }
//! }
//! ```
//! Keys this crate does not manage are preserved on save, at every level.
//! A file that cannot be parsed is read as defaults but never overwritten.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, CurrencyFormat, DEFAULT_CATEGORY};

const SETTINGS_FILE: &str = "settings.json";

/// Environment override for sample mode (for CI/testing)
pub const SAMPLE_MODE_ENV: &str = "SUBSCRIBE_SAMPLE_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    display: DisplaySettings,
    #[serde(default)]
    auth: AuthSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    sample_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplaySettings {
    #[serde(default)]
    currency: CurrencyFormat,
    #[serde(default = "default_category")]
    default_category: String,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            default_category: default_category(),
            other: HashMap::new(),
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettings {
    #[serde(default)]
    argon2: Argon2Params,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Subscribe configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub sample_mode: bool,
    pub currency: CurrencyFormat,
    pub default_category: String,
    pub argon2: Argon2Params,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_mode: false,
            currency: CurrencyFormat::default(),
            default_category: default_category(),
            argon2: Argon2Params::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory.
    ///
    /// A missing or unreadable settings file yields defaults. Sample mode can
    /// also be forced with `SUBSCRIBE_SAMPLE_MODE`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?.unwrap_or_default();

        let sample_mode = match std::env::var(SAMPLE_MODE_ENV).ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.sample_mode,
        };

        let default_category = match raw.display.default_category.trim() {
            "" => default_category(),
            category => category.to_string(),
        };

        Ok(Self {
            sample_mode,
            currency: raw.display.currency,
            default_category,
            argon2: raw.auth.argon2,
        })
    }

    /// Save config, keeping fields this crate does not manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?.ok_or_else(|| {
            Error::Config(format!(
                "{} is not valid; fix or remove it before changing settings",
                data_dir.join(SETTINGS_FILE).display()
            ))
        })?;

        settings.app.sample_mode = self.sample_mode;
        settings.display.currency = self.currency.clone();
        settings.display.default_category = self.default_category.clone();
        settings.auth.argon2 = self.argon2.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    pub fn enable_sample_mode(&mut self) {
        self.sample_mode = true;
    }

    pub fn disable_sample_mode(&mut self) {
        self.sample_mode = false;
    }

    /// Database file for the current mode
    pub fn db_filename(&self) -> &'static str {
        if self.sample_mode {
            "sample.duckdb"
        } else {
            "subscribe.duckdb"
        }
    }
}

/// Read settings.json. A missing file is empty settings; `None` means the
/// file exists but does not parse.
fn read_settings(data_dir: &Path) -> Result<Option<SettingsFile>> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(Some(SettingsFile::default()));
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitPosition;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.default_category, "Independent");
        assert_eq!(config.currency, CurrencyFormat::default());
        assert_eq!(config.argon2, Argon2Params::default());
        assert_eq!(config.db_filename(), "subscribe.duckdb");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_category, "Independent");
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "app": { "theme": "dark" }, "widgets": [1, 2] }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.currency = CurrencyFormat {
            unit: "$".to_string(),
            position: UnitPosition::Prefix,
            grouping_separator: ",".to_string(),
        };
        config.default_category = "Streaming".to_string();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap()).unwrap();
        assert_eq!(raw["app"]["theme"], "dark");
        assert_eq!(raw["widgets"], serde_json::json!([1, 2]));
        assert_eq!(raw["display"]["currency"]["unit"], "$");

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.default_category, "Streaming");
        assert_eq!(reloaded.currency.position, UnitPosition::Prefix);
    }

    #[test]
    fn test_partial_argon2_section_uses_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "auth": {} }"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.argon2.memory_cost, 65536);
    }

    fn read_raw(dir: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(dir.join(SETTINGS_FILE)).unwrap()).unwrap()
    }

    #[test]
    fn test_save_preserves_unknown_keys_in_every_section() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "display": { "theme": "dark" }, "auth": { "remember": true } }"#,
        )
        .unwrap();

        Config::load(dir.path()).unwrap().save(dir.path()).unwrap();

        let raw = read_raw(dir.path());
        assert_eq!(raw["display"]["theme"], "dark");
        assert_eq!(raw["auth"]["remember"], true);
        assert_eq!(raw["display"]["defaultCategory"], "Independent");
    }

    #[test]
    fn test_partial_currency_keeps_rest_of_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "app": { "sampleMode": true }, "display": { "currency": { "unit": "$" } }, "widgets": [1] }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(config.sample_mode);
        assert_eq!(config.currency.unit, "$");
        assert_eq!(config.currency.position, UnitPosition::Suffix);

        config.save(dir.path()).unwrap();
        let raw = read_raw(dir.path());
        assert_eq!(raw["widgets"], serde_json::json!([1]));
        assert_eq!(raw["app"]["sampleMode"], true);
        assert_eq!(raw["display"]["currency"]["unit"], "$");
    }

    #[test]
    fn test_save_refuses_to_overwrite_unparseable_file() {
        let dir = tempdir().unwrap();
        let broken = r#"{ "app": { "sampleMode": "sometimes" }, "widgets": [1] }"#;
        std::fs::write(dir.path().join(SETTINGS_FILE), broken).unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.enable_sample_mode();
        let err = config.save(dir.path()).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert_eq!(std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(), broken);
    }
}
