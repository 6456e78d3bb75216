//! Configuration system for the expiry warden.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `config.toml` file (or the file named by `WARDEN_CONFIG`)
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `WARDEN_CONFIG` - Path of the configuration file (without extension is fine)
//! - `WARDEN_DATABASE_TYPE` - Database type (`sqlite` or `postgres`)
//! - `WARDEN_DATABASE_URL` - Database connection URL
//! - `WARDEN_EXPIRE_WARNING` - Enable expiration warnings
//! - `WARDEN_EXPIRE_DAYS` - Length of the warning window in days
//! - `WARDEN_WEBSITE_NAME` - Site display name used in e-mails
//! - `WARDEN_SMTP_HOST` / `WARDEN_SMTP_PORT` - SMTP relay
//! - `WARDEN_SMTP_USERNAME` / `WARDEN_SMTP_PASSWORD` - SMTP credentials
//! - `WARDEN_SMTP_FROM` - Sender mailbox
//! - `WARDEN_SCHEDULE_CRON` - Cron expression for `expiry_warden schedule`
//! - `WARDEN_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
//!
//! The loaded [`WardenConfig`] is handed to the job explicitly; there is no
//! process-wide singleton.

use config::Config;
use serde::Deserialize;
use std::env;

use crate::errors::{WardenError, WardenResult};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "WARDEN_CONFIG";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Outgoing mail configuration
    pub smtp: SmtpConfig,
    /// Expiration warning settings
    pub warning: WarningConfig,
    /// Cron schedule for daemon mode
    pub schedule: ScheduleConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database type: "sqlite" or "postgres"
    pub db_type: String,
    /// SQLite connection URL
    pub sqlite_url: String,
    /// PostgreSQL connection URL
    pub postgres_url: String,
    /// Maximum pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: "sqlite".to_string(),
            sqlite_url: "sqlite://warden.db".to_string(),
            postgres_url: "postgres://localhost/warden".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL for the selected backend.
    pub fn url(&self) -> &str {
        match self.db_type.as_str() {
            "postgres" => &self.postgres_url,
            _ => &self.sqlite_url,
        }
    }
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host name
    pub host: String,
    /// Relay port
    pub port: u16,
    /// Username; empty disables authentication
    pub username: String,
    /// Password
    pub password: String,
    /// Sender mailbox, e.g. `Support <noreply@example.com>`
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "noreply@localhost".to_string(),
        }
    }
}

/// Expiration warning settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WarningConfig {
    /// Master switch for the warning job
    pub expire_warning: bool,
    /// Days before expiry during which a daily warning is sent
    pub expire_days: u32,
    /// Site display name used in the mail templates
    pub website_name: String,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            expire_warning: true,
            expire_days: 15,
            website_name: "Website".to_string(),
        }
    }
}

/// Cron schedule used by `expiry_warden schedule`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Six-field cron expression (sec min hour day month weekday)
    pub cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            // Daily at 00:30
            cron: "0 30 0 * * *".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn config_err(e: config::ConfigError) -> WardenError {
    WardenError::ConfigError(e.to_string())
}

impl WardenConfig {
    /// Load configuration from file and environment, then validate it.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` (or `$WARDEN_CONFIG`), optional
    /// 3. Environment variables
    pub fn load() -> WardenResult<Self> {
        let file = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        let config = Self::load_from(&file)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using `file` as the optional file source.
    ///
    /// Does not validate; call [`WardenConfig::validate`] afterwards.
    pub fn load_from(file: &str) -> WardenResult<Self> {
        let defaults = WardenConfig::default();

        let builder = Config::builder()
            // Start with defaults
            .set_default("database.db_type", defaults.database.db_type)
            .map_err(config_err)?
            .set_default("database.sqlite_url", defaults.database.sqlite_url)
            .map_err(config_err)?
            .set_default("database.postgres_url", defaults.database.postgres_url)
            .map_err(config_err)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )
            .map_err(config_err)?
            .set_default("smtp.host", defaults.smtp.host)
            .map_err(config_err)?
            .set_default("smtp.port", i64::from(defaults.smtp.port))
            .map_err(config_err)?
            .set_default("smtp.username", defaults.smtp.username)
            .map_err(config_err)?
            .set_default("smtp.password", defaults.smtp.password)
            .map_err(config_err)?
            .set_default("smtp.from", defaults.smtp.from)
            .map_err(config_err)?
            .set_default("warning.expire_warning", defaults.warning.expire_warning)
            .map_err(config_err)?
            .set_default(
                "warning.expire_days",
                i64::from(defaults.warning.expire_days),
            )
            .map_err(config_err)?
            .set_default("warning.website_name", defaults.warning.website_name)
            .map_err(config_err)?
            .set_default("schedule.cron", defaults.schedule.cron)
            .map_err(config_err)?
            .set_default("logging.level", defaults.logging.level)
            .map_err(config_err)?
            // Load from config file (optional)
            .add_source(config::File::with_name(file).required(false))
            // Override with environment variables. Values are passed through as
            // strings so deserialization coerces them (`0`/`off` for booleans)
            // and rejects anything unparseable.
            .set_override_option("database.db_type", env::var("WARDEN_DATABASE_TYPE").ok())
            .map_err(config_err)?
            .set_override_option(
                "database.sqlite_url",
                env::var("WARDEN_DATABASE_URL")
                    .ok()
                    .filter(|url| url.starts_with("sqlite")),
            )
            .map_err(config_err)?
            .set_override_option(
                "database.postgres_url",
                env::var("WARDEN_DATABASE_URL")
                    .ok()
                    .filter(|url| url.starts_with("postgres")),
            )
            .map_err(config_err)?
            .set_override_option(
                "warning.expire_warning",
                env::var("WARDEN_EXPIRE_WARNING").ok(),
            )
            .map_err(config_err)?
            .set_override_option("warning.expire_days", env::var("WARDEN_EXPIRE_DAYS").ok())
            .map_err(config_err)?
            .set_override_option("warning.website_name", env::var("WARDEN_WEBSITE_NAME").ok())
            .map_err(config_err)?
            .set_override_option("smtp.host", env::var("WARDEN_SMTP_HOST").ok())
            .map_err(config_err)?
            .set_override_option("smtp.port", env::var("WARDEN_SMTP_PORT").ok())
            .map_err(config_err)?
            .set_override_option("smtp.username", env::var("WARDEN_SMTP_USERNAME").ok())
            .map_err(config_err)?
            .set_override_option("smtp.password", env::var("WARDEN_SMTP_PASSWORD").ok())
            .map_err(config_err)?
            .set_override_option("smtp.from", env::var("WARDEN_SMTP_FROM").ok())
            .map_err(config_err)?
            .set_override_option("schedule.cron", env::var("WARDEN_SCHEDULE_CRON").ok())
            .map_err(config_err)?
            .set_override_option("logging.level", env::var("WARDEN_LOG_LEVEL").ok())
            .map_err(config_err)?;

        let settings = builder
            .build()
            .map_err(|e| WardenError::ConfigError(format!("failed to build config: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| WardenError::ConfigError(format!("failed to deserialize config: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> WardenResult<()> {
        // Validate database type
        match self.database.db_type.as_str() {
            "sqlite" | "postgres" => {}
            other => {
                return Err(WardenError::ConfigError(format!(
                    "database.db_type must be 'sqlite' or 'postgres', got '{other}'"
                )));
            }
        }
        if self.database.url().is_empty() {
            return Err(WardenError::ConfigError(
                "database URL cannot be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(WardenError::ConfigError(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        if self.smtp.port == 0 {
            return Err(WardenError::ConfigError(
                "smtp.port must be greater than 0".to_string(),
            ));
        }
        if self.smtp.from.trim().is_empty() {
            return Err(WardenError::ConfigError(
                "smtp.from cannot be empty".to_string(),
            ));
        }

        if self.schedule.cron.trim().is_empty() {
            return Err(WardenError::ConfigError(
                "schedule.cron cannot be empty".to_string(),
            ));
        }

        // Validate log level
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(WardenError::ConfigError(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WardenConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.warning.expire_warning);
        assert_eq!(config.warning.expire_days, 15);
        assert_eq!(config.database.url(), "sqlite://warden.db");
    }

    #[test]
    fn rejects_unknown_database_type() {
        let mut config = WardenConfig::default();
        config.database.db_type = "mysql".to_string();
        assert!(matches!(
            config.validate(),
            Err(WardenError::ConfigError(_))
        ));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = WardenConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn postgres_url_selected_by_type() {
        let mut config = WardenConfig::default();
        config.database.db_type = "postgres".to_string();
        assert_eq!(config.database.url(), "postgres://localhost/warden");
    }
}
