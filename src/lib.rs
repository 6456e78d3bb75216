//! Expiry Warden - e-mails users before their accounts expire.
//!
//! A scheduled job reads every enabled account, works out how many days are
//! left before it expires and sends a warning mail on the expiry day and
//! during the configured warning window. Each delivery attempt is written to
//! the `email_log` table.
//!
//! # Features
//!
//! - `sqlite` - SQLite database backend. Enabled by default.
//! - `postgres` - PostgreSQL database backend.
//! - `scheduler` - In-process cron scheduling. Enabled by default.
//!
//! # Example
//!
//! ```rust,ignore
//! use expiry_warden::config::WardenConfig;
//! use expiry_warden::jobs::run_warning_job;
//! use expiry_warden::mail::SmtpMailer;
//! use expiry_warden::store::Database;
//!
//! let config = WardenConfig::load()?;
//! let db = Database::connect(&config.database).await?;
//! let mailer = SmtpMailer::from_config(&config.smtp)?;
//! let report = run_warning_job(&db, &mailer, &config.warning).await?;
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod logging;
pub mod mail;
pub mod store;
pub mod validation;
