//! Web server settings with environment overrides.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid port `{0}`")]
    InvalidPort(String),
}

/// Where the server listens and which artifacts and database it uses.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub app_name: String,
    pub database_path: PathBuf,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            app_name: "BodyFatCalculator".to_string(),
            database_path: PathBuf::from("data/bodyfat.db"),
            model_path: PathBuf::from("models/lasso.bin"),
            scaler_path: PathBuf::from("models/scaler.bin"),
        }
    }
}

impl AppSettings {
    /// Defaults overridden by `BODYFAT_HOST`, `BODYFAT_PORT`,
    /// `DATABASE_URL`, `BODYFAT_MODEL_PATH` and `BODYFAT_SCALER_PATH`.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Self::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(host) = lookup("BODYFAT_HOST") {
            settings.host = host;
        }
        if let Some(port) = lookup("BODYFAT_PORT") {
            settings.port = port
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidPort(port.clone()))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            settings.database_path = database_path_from_url(&url);
        }
        if let Some(path) = lookup("BODYFAT_MODEL_PATH") {
            settings.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("BODYFAT_SCALER_PATH") {
            settings.scaler_path = PathBuf::from(path);
        }
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts a bare path or a `sqlite://` URL (`sqlite:///data/bodyfat.db`
/// means the relative path `data/bodyfat.db`).
fn database_path_from_url(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite:///")
        .or_else(|| url.strip_prefix("sqlite://"))
        .unwrap_or(url);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = AppSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.bind_addr(), "0.0.0.0:5001");
        assert_eq!(settings.app_name, "BodyFatCalculator");
    }

    #[test]
    fn test_env_overrides() {
        let settings = AppSettings::from_lookup(lookup_from(&[
            ("BODYFAT_HOST", "127.0.0.1"),
            ("BODYFAT_PORT", "8080"),
            ("DATABASE_URL", "sqlite:///tmp/users.db"),
            ("BODYFAT_MODEL_PATH", "artifacts/model.bin"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr(), "127.0.0.1:8080");
        assert_eq!(settings.database_path, PathBuf::from("tmp/users.db"));
        assert_eq!(settings.model_path, PathBuf::from("artifacts/model.bin"));
        assert_eq!(settings.scaler_path, PathBuf::from("models/scaler.bin"));
    }

    #[test]
    fn test_bare_database_path() {
        let settings =
            AppSettings::from_lookup(lookup_from(&[("DATABASE_URL", "data/other.db")])).unwrap();
        assert_eq!(settings.database_path, PathBuf::from("data/other.db"));
    }

    #[test]
    fn test_invalid_port() {
        let result = AppSettings::from_lookup(lookup_from(&[("BODYFAT_PORT", "http")]));
        assert_eq!(result, Err(SettingsError::InvalidPort("http".into())));
    }
}
