use bizbalance_domain::FormulaMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Stores user-configurable shell preferences and insight settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Formula mode the shell starts in. Toggling at runtime does not change it.
    #[serde(default)]
    pub default_formula: FormulaMode,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_insight_model")]
    pub insight_model: String,
    #[serde(default = "Config::default_insight_timeout_secs")]
    pub insight_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for state and backups. Defaults to the app home.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_formula: FormulaMode::Standard,
            ui_color_enabled: Self::default_ui_color_enabled(),
            insight_model: Self::default_insight_model(),
            insight_timeout_secs: Self::default_insight_timeout_secs(),
            insight_endpoint: None,
            data_root: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 8] = [
        "locale",
        "currency",
        "default_formula",
        "ui_color_enabled",
        "insight_model",
        "insight_timeout_secs",
        "insight_endpoint",
        "data_root",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_insight_model() -> String {
        "gemini-2.5-flash".into()
    }

    pub fn default_insight_timeout_secs() -> u64 {
        30
    }

    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        self.data_root.clone().unwrap_or_else(|| base.to_path_buf())
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "default_formula" => self.default_formula.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "insight_model" => self.insight_model.clone(),
            "insight_timeout_secs" => self.insight_timeout_secs.to_string(),
            "insight_endpoint" => self.insight_endpoint.clone().unwrap_or_default(),
            "data_root" => self
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Updates `key` from text. Empty values clear optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => self.locale = non_empty(trimmed).ok_or_else(|| invalid("must not be empty"))?,
            "currency" => {
                self.currency = non_empty(trimmed)
                    .map(|code| code.to_ascii_uppercase())
                    .ok_or_else(|| invalid("must not be empty"))?
            }
            "default_formula" => {
                self.default_formula = match trimmed.to_ascii_lowercase().as_str() {
                    "standard" => FormulaMode::Standard,
                    "strict" => FormulaMode::Strict,
                    _ => return Err(invalid("expected `standard` or `strict`")),
                }
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match trimmed.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid("expected `true` or `false`")),
                }
            }
            "insight_model" => {
                self.insight_model = non_empty(trimmed).ok_or_else(|| invalid("must not be empty"))?
            }
            "insight_timeout_secs" => {
                self.insight_timeout_secs = trimmed
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| invalid("expected a positive number of seconds"))?
            }
            "insight_endpoint" => self.insight_endpoint = non_empty(trimmed),
            "data_root" => self.data_root = non_empty(trimmed).map(PathBuf::from),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
