use crate::ai::client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, ModelConfig};
use crate::db;
use crate::error::ProviderError;
use crate::logger;
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_VAR: &str = "STUDY_BUDDY_MODEL";
pub const TEMPERATURE_VAR: &str = "STUDY_BUDDY_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "STUDY_BUDDY_MAX_TOKENS";
pub const DATA_DIR_VAR: &str = "STUDY_BUDDY_DATA_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: ModelConfig,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut model = ModelConfig::default();
        if let Some(name) = get(MODEL_VAR) {
            model.model = name;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            model.temperature = Some(parse_or(&raw, TEMPERATURE_VAR, DEFAULT_TEMPERATURE));
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            model.max_tokens = Some(parse_or(&raw, MAX_TOKENS_VAR, DEFAULT_MAX_TOKENS));
        }

        Self {
            api_key: get(API_KEY_VAR),
            model,
            data_dir: get(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(db::default_data_dir),
        }
    }

    pub fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Client(format!("{} is not set", API_KEY_VAR)))
    }

    pub fn db_path(&self) -> PathBuf {
        db::db_path(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("study_buddy_debug.log")
    }
}

fn parse_or<T: std::str::FromStr>(raw: &str, name: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        logger::log(&format!("Invalid value {:?} for {}, using default", raw, name));
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert!(config.api_key.is_none());
        assert!(config.api_key().is_err());
        assert_eq!(config.model.model, "openai/gpt-oss-120b");
        assert_eq!(config.model.temperature, Some(0.3));
        assert_eq!(config.model.max_tokens, Some(4096));
        assert!(config.data_dir.ends_with("study-buddy"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "anthropic/claude-3.5-haiku"),
            (TEMPERATURE_VAR, "0.7"),
            (MAX_TOKENS_VAR, "1024"),
            (DATA_DIR_VAR, "/tmp/sb"),
        ]);
        assert_eq!(config.api_key().unwrap(), "sk-test");
        assert_eq!(config.model.model, "anthropic/claude-3.5-haiku");
        assert_eq!(config.model.temperature, Some(0.7));
        assert_eq!(config.model.max_tokens, Some(1024));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/sb/study-buddy.db"));
        assert_eq!(
            config.log_path(),
            PathBuf::from("/tmp/sb/study_buddy_debug.log")
        );
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[(TEMPERATURE_VAR, "warm"), (MAX_TOKENS_VAR, "-5")]);
        assert_eq!(config.model.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(config.model.max_tokens, Some(DEFAULT_MAX_TOKENS));
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = config_from(&[(API_KEY_VAR, "   ")]);
        assert!(config.api_key.is_none());
    }
}
