//! Persistence for the warning job.
//!
//! - `database` → account scan and notification log over SQLite/Postgres
//! - `models`   → row types read from and written to the database

pub mod database;
pub mod models;

pub use database::Database;
pub use models::{Account, DeliveryStatus, NewNotificationLog, NotificationLog};
