//! Application settings loading from config.toml
//!
//! Every field has a default, so the service starts without a config file.
//! Values from the environment (optionally loaded from `.env`) override the
//! file: `DATABASE_URL`, `BIND_ADDRESS`, `ADMIN_USERNAME` and `ADMIN_PASSWORD`.

use crate::core::order::TransitionPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Storage settings
    pub database: DatabaseConfig,
    /// Admin login settings
    pub auth: AuthConfig,
    /// Order lifecycle settings
    pub orders: OrdersConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP API binds to
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// `[database]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SeaORM` connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: super::database::DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// `[auth]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Username accepted by the admin login
    pub admin_username: String,
    /// Password accepted by the admin login
    pub admin_password: String,
    /// Lifetime of an issued session token
    pub session_ttl_minutes: i64,
    /// Whether admin routes reject requests without a session token
    pub require_admin_session: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "change-me".to_string(),
            session_ttl_minutes: 720,
            require_admin_session: false,
        }
    }
}

/// `[orders]` section
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// How status updates are checked
    pub transition_policy: TransitionPolicy,
}

/// Parses configuration from TOML text
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a value has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Loads the application configuration the way the server starts up.
///
/// Reads the file named by `CONFIG_PATH` (default `./config.toml`); a missing
/// file yields the defaults. Environment overrides are applied afterwards.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

    let mut config = if Path::new(&path).exists() {
        tracing::info!(path = %path, "loading configuration file");
        load_config(&path)?
    } else {
        tracing::info!(path = %path, "no configuration file, using defaults");
        AppConfig::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

impl AppConfig {
    /// Overrides file values with whatever `lookup` returns for the known keys.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(address) = lookup("BIND_ADDRESS") {
            self.server.bind_address = address;
        }
        if let Some(username) = lookup("ADMIN_USERNAME") {
            self.auth.admin_username = username;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.auth.admin_password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "127.0.0.1:8080"

            [database]
            url = "sqlite::memory:"

            [auth]
            admin_username = "owner"
            admin_password = "secret"
            session_ttl_minutes = 30
            require_admin_session = true

            [orders]
            transition_policy = "strict"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.auth.admin_username, "owner");
        assert_eq!(config.auth.session_ttl_minutes, 30);
        assert!(config.auth.require_admin_session);
        assert_eq!(config.orders.transition_policy, TransitionPolicy::Strict);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[server]\nbind_address = \"127.0.0.1:1\"\n").unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:1");
        assert_eq!(config.auth.admin_username, "admin");
        assert!(!config.auth.require_admin_session);
        assert_eq!(
            config.orders.transition_policy,
            TransitionPolicy::Permissive
        );
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let result = parse_config("[orders]\ntransition_policy = \"sometimes\"\n");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("ADMIN_PASSWORD", "from-env"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.auth.admin_password, "from-env");
        assert_eq!(config.auth.admin_username, "admin");
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
    }
}
