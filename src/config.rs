//! Configuration loader and validator for the question form client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_STORE_URL: &str = "STORE_URL";
pub const ENV_STORE_API_KEY: &str = "STORE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub store: Store,
}

/// Remote store location, credentials and collection mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_order_field")]
    pub order_field: String,
    #[serde(default = "default_probe_column")]
    pub probe_column: String,
}

fn default_collection() -> String {
    "output_table".into()
}

fn default_order_field() -> String {
    "created_at".into()
}

fn default_probe_column() -> String {
    "id".into()
}

impl Config {
    /// Replace store credentials with `STORE_URL` / `STORE_API_KEY` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_STORE_URL).ok(),
            std::env::var(ENV_STORE_API_KEY).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, api_key: Option<String>) {
        if let Some(url) = url.filter(|v| !v.trim().is_empty()) {
            self.store.url = url;
        }
        if let Some(key) = api_key.filter(|v| !v.trim().is_empty()) {
            self.store.api_key = key;
        }
    }
}

/// Load configuration from a YAML file, apply environment overrides and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;
    cfg.apply_env_overrides();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let store = &cfg.store;
    if store.url.trim().is_empty() {
        return Err(ConfigError::Invalid("store.url must be non-empty"));
    }
    if Url::parse(&store.url).is_err() {
        return Err(ConfigError::Invalid("store.url must be an absolute URL"));
    }
    if store.api_key.trim().is_empty() {
        return Err(ConfigError::Invalid("store.api_key must be non-empty"));
    }
    if store.collection.trim().is_empty() {
        return Err(ConfigError::Invalid("store.collection must be non-empty"));
    }
    if store.order_field.trim().is_empty() {
        return Err(ConfigError::Invalid("store.order_field must be non-empty"));
    }
    if store.probe_column.trim().is_empty() {
        return Err(ConfigError::Invalid("store.probe_column must be non-empty"));
    }
    Ok(())
}

/// Returns the example YAML shipped with the client.
pub fn example() -> &'static str {
    r#"store:
  url: "https://YOUR-PROJECT.supabase.co"
  api_key: "YOUR_SUPABASE_ANON_KEY"
  collection: "output_table"
  order_field: "created_at"
  probe_column: "id"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.store.collection, "output_table");
    }

    #[test]
    fn defaults_fill_collection_mapping() {
        let cfg: Config =
            serde_yaml::from_str("store:\n  url: \"http://localhost:54321\"\n  api_key: \"k\"\n")
                .unwrap();
        assert_eq!(cfg.store.collection, "output_table");
        assert_eq!(cfg.store.order_field, "created_at");
        assert_eq!(cfg.store.probe_column, "id");
    }

    #[test]
    fn invalid_url() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.store.url = "".into();
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("store.url")), _ => panic!("wrong error") }

        cfg.store.url = "not a url".into();
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("absolute URL")), _ => panic!("wrong error") }
    }

    #[test]
    fn invalid_store_fields() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.store.api_key = "  ".into();
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("api_key")), _ => panic!("wrong error") }

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.store.collection = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.store.order_field = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.store.probe_column = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn overrides_replace_credentials_only_when_present() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.apply_overrides(Some("http://127.0.0.1:54321".into()), None);
        assert_eq!(cfg.store.url, "http://127.0.0.1:54321");
        assert_eq!(cfg.store.api_key, "YOUR_SUPABASE_ANON_KEY");

        cfg.apply_overrides(Some("".into()), Some("secret".into()));
        assert_eq!(cfg.store.url, "http://127.0.0.1:54321");
        assert_eq!(cfg.store.api_key, "secret");
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example()).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.store.order_field, "created_at");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let td = tempdir().unwrap();
        let err = load(Some(&td.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
