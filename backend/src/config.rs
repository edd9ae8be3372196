use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::auth::types::AuthConfig;

/// Application configuration read from environment variables
/// (`DATABASE_URL`, `PORT`, `JWT_SECRET`, `GITHUB_CLIENT_ID`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub github_client_id: String,
    pub github_client_secret: String,
    pub github_callback_url: String,
    pub token_duration_days: i64,
    pub cookie_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    fn from_source(source: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("port", 8080)?
            .set_default("token_duration_days", 7)?
            .set_default("cookie_name", "session_token")?
            .set_default("github_callback_url", "http://localhost:8080/auth/github/callback")?
            .add_source(source)
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("DATABASE_URL, JWT_SECRET, GITHUB_CLIENT_ID and GITHUB_CLIENT_SECRET must be set")
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_duration_days: self.token_duration_days,
            cookie_name: self.cookie_name.clone(),
            github_client_id: self.github_client_id.clone(),
            github_client_secret: self.github_client_secret.clone(),
            github_callback_url: self.github_callback_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().try_parsing(true).source(Some(source))
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://localhost/schedule"),
            ("JWT_SECRET", "secret"),
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "shh"),
        ]))
        .expect("should load config");

        assert_eq!(config.port, 8080);
        assert_eq!(config.token_duration_days, 7);
        assert_eq!(config.cookie_name, "session_token");
        assert_eq!(config.auth().github_client_id, "id");
    }

    #[test]
    fn port_is_parsed_from_environment() {
        let config = AppConfig::from_source(env(&[
            ("DATABASE_URL", "postgres://localhost/schedule"),
            ("JWT_SECRET", "secret"),
            ("GITHUB_CLIENT_ID", "id"),
            ("GITHUB_CLIENT_SECRET", "shh"),
            ("PORT", "3000"),
        ]))
        .expect("should load config");

        assert_eq!(config.port, 3000);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = AppConfig::from_source(env(&[("DATABASE_URL", "postgres://x")]));
        assert!(result.is_err());
    }
}
