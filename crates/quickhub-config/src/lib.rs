//! Configuration loading and credential resolution for quickhub.
//!
//! Connection parameters come from two layered sources, later wins:
//!
//! 1. An optional TOML file at the platform config path
//!    (e.g. `~/.config/quickhub/config.toml`)
//! 2. `HC3_`-prefixed environment variables: `HC3_HOST`, `HC3_USER`,
//!    `HC3_PASSWORD`, `HC3_PROTOCOL`
//!
//! [`LiveSettings`] implements [`ConfigProvider`] by re-resolving the
//! sources on every call, so a rotated password or changed host takes
//! effect on the next request without restarting anything.

use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use quickhub_api::{ConfigProvider, ConnectionInfo, Error as ApiError};

/// The environment variable prefix shared by all settings.
pub const ENV_PREFIX: &str = "HC3_";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered sources did not yield a complete configuration.
    #[error(
        "hub connection not configured ({0}); set HC3_HOST, HC3_USER and \
         HC3_PASSWORD, or fill in the config file"
    )]
    Incomplete(#[source] figment::Error),

    /// A required value resolved to an empty string.
    #[error("hub connection not configured: {field} is empty")]
    Empty { field: &'static str },
}

/// Resolved connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// `http` or `https`.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub host: String,
    pub user: String,
    pub password: SecretString,
}

fn default_protocol() -> String {
    "http".into()
}

impl Settings {
    /// Resolve settings from the config file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::new().merge(Toml::file(config_path())).merge(
            Env::prefixed(ENV_PREFIX),
        ))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: Self = figment.extract().map_err(ConfigError::Incomplete)?;
        settings.validate()?;
        debug!(host = %settings.host, protocol = %settings.protocol, "resolved hub settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        use secrecy::ExposeSecret;

        if self.host.is_empty() {
            return Err(ConfigError::Empty { field: "host" });
        }
        if self.user.is_empty() {
            return Err(ConfigError::Empty { field: "user" });
        }
        if self.password.expose_secret().is_empty() {
            return Err(ConfigError::Empty { field: "password" });
        }
        Ok(())
    }

    /// The parameters a [`HubClient`](quickhub_api::HubClient) needs.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            scheme: self.protocol.clone(),
            host: self.host.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// Path of the quickhub config file.
pub fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "quickhub")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("quickhub.toml"))
}

/// A starter config file body, for `config init`.
pub fn example_config() -> String {
    let example = toml::toml! {
        protocol = "http"
        host = "192.168.1.57"
        user = "admin"
        password = "change-me"
    };
    toml::to_string_pretty(&example).unwrap_or_default()
}

/// A [`ConfigProvider`] that re-resolves the layered sources on every
/// request, so credential rotation takes effect on the next call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveSettings;

impl ConfigProvider for LiveSettings {
    fn connection(&self) -> Result<ConnectionInfo, ApiError> {
        let settings = Settings::load().map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(settings.connection_info())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    #[test]
    fn environment_variables_resolve() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HC3_HOST", "192.168.1.57");
            jail.set_env("HC3_USER", "admin");
            jail.set_env("HC3_PASSWORD", "hunter2");

            let settings =
                Settings::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
                    .expect("settings should resolve");
            assert_eq!(settings.host, "192.168.1.57");
            assert_eq!(settings.protocol, "http");
            assert_eq!(settings.password.expose_secret(), "hunter2");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    host = "file-host"
                    user = "file-user"
                    password = "file-pass"
                    protocol = "https"
                "#,
            )?;
            jail.set_env("HC3_HOST", "env-host");

            let settings = Settings::from_figment(
                Figment::new()
                    .merge(Toml::file("config.toml"))
                    .merge(Env::prefixed(ENV_PREFIX)),
            )
            .expect("settings should resolve");
            assert_eq!(settings.host, "env-host");
            assert_eq!(settings.user, "file-user");
            assert_eq!(settings.protocol, "https");
            Ok(())
        });
    }

    #[test]
    fn example_config_resolves() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", &example_config())?;

            let settings =
                Settings::from_figment(Figment::new().merge(Toml::file("config.toml")))
                    .expect("example config should resolve");
            assert_eq!(settings.host, "192.168.1.57");
            Ok(())
        });
    }

    #[test]
    fn missing_credentials_fail() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HC3_HOST", "192.168.1.57");

            let result =
                Settings::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)));
            assert!(matches!(result, Err(ConfigError::Incomplete(_))));
            Ok(())
        });
    }

    #[test]
    fn empty_host_fails() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HC3_HOST", "");
            jail.set_env("HC3_USER", "admin");
            jail.set_env("HC3_PASSWORD", "hunter2");

            let result =
                Settings::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)));
            assert!(matches!(result, Err(ConfigError::Empty { field: "host" })));
            Ok(())
        });
    }
}
