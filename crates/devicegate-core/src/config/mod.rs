//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod logging;
pub mod persistence;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::persistence::PersistenceConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Device session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Session snapshot settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DEVICEGATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DEVICEGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate_for(env)?;
        Ok(config)
    }

    /// Runs [`validate`](Self::validate) and the checks that depend on the
    /// environment name. Production refuses the built-in JWT secret.
    pub fn validate_for(&self, env: &str) -> Result<(), AppError> {
        self.validate()?;
        if env == "production" && self.auth.uses_default_secret() {
            return Err(AppError::configuration(
                "auth.jwt_secret is the built-in default; set DEVICEGATE__AUTH__JWT_SECRET",
            ));
        }
        Ok(())
    }

    /// Settings that are accepted but unsafe to deploy with.
    ///
    /// Returned rather than logged so callers can report them once logging
    /// is initialized.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.auth.uses_default_secret() {
            warnings.push(
                "auth.jwt_secret is the built-in default; set a real secret before deploying",
            );
        }
        warnings
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.persistence.enabled && self.persistence.path.trim().is_empty() {
            return Err(AppError::configuration(
                "persistence.path must be set when persistence is enabled",
            ));
        }
        if self.persistence.flush_interval_seconds == 0 {
            return Err(AppError::configuration(
                "persistence.flush_interval_seconds must be at least 1",
            ));
        }
        if self.session.default_device_name.trim().is_empty() {
            return Err(AppError::configuration(
                "session.default_device_name must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.session.max_devices.max(), 3);
        assert!(!config.persistence.enabled);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = String::new();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let mut config = AppConfig::default();
        let err = config.validate_for("production").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        config.validate_for("development").unwrap();

        config.auth.jwt_secret = "a-real-deployment-secret".to_string();
        config.validate_for("production").unwrap();
    }

    #[test]
    fn test_default_secret_reported_as_warning() {
        let mut config = AppConfig::default();
        assert_eq!(config.warnings().len(), 1);
        assert!(config.warnings()[0].contains("jwt_secret"));

        config.auth.jwt_secret = "a-real-deployment-secret".to_string();
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_zero_flush_interval_rejected() {
        let mut config = AppConfig::default();
        config.persistence.flush_interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "session": { "max_devices": 5 },
            "logging": { "format": "pretty" }
        }))
        .unwrap();
        assert_eq!(config.session.max_devices.max(), 5);
        assert_eq!(config.session.default_device_name, "Unknown Device");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_zero_max_devices_fails_to_deserialize() {
        let result: Result<AppConfig, _> = serde_json::from_value(serde_json::json!({
            "session": { "max_devices": 0 }
        }));
        assert!(result.is_err());
    }
}
