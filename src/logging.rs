//! Structured logging for the warning job.
//!
//! This module provides:
//! - Subscriber initialisation from [`LoggingConfig`]
//! - Per-attempt notification events
//! - The end-of-job timing line
//!
//! # Usage
//!
//! ```rust,ignore
//! use expiry_warden::logging::init_logging;
//!
//! init_logging(&config.logging);
//! ```

use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Level};

use crate::config::LoggingConfig;
use crate::store::DeliveryStatus;

/// Install the global fmt subscriber at the configured level.
///
/// Unknown levels fall back to `info`. Returns `false` when a global
/// subscriber was already installed, in which case the existing one is kept.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);

    match tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Subscriber already installed, keeping it");
            false
        }
    }
}

/// Notification event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// Account expires at the end of today
    ExpiresToday,
    /// Account expires within the warning window
    ExpiringSoon,
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationEvent::ExpiresToday => "expires_today",
            NotificationEvent::ExpiringSoon => "expiring_soon",
        };
        write!(f, "{}", s)
    }
}

/// Log the outcome of one delivery attempt.
///
/// # Arguments
///
/// * `event` - Which warning was sent
/// * `user_id` - The account the warning was for
/// * `days_left` - Whole days until expiry
/// * `status` - Delivery outcome
/// * `error` - Transport error, when the delivery failed
pub fn log_notification_event(
    event: NotificationEvent,
    user_id: i64,
    days_left: i64,
    status: DeliveryStatus,
    error: Option<&str>,
) {
    let span = info_span!(
        "expire_warning",
        event = %event,
        user_id = user_id,
        days_left = days_left,
    );
    let _enter = span.enter();

    match (status, error) {
        (DeliveryStatus::Failed, Some(e)) => warn!(error = %e, "Warning mail delivery failed"),
        (DeliveryStatus::Failed, None) => warn!("Warning mail delivery failed"),
        (DeliveryStatus::Delivered, _) => info!("Warning mail delivered"),
    }
}

/// Seconds rounded to four decimal places.
pub fn elapsed_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 10_000.0).round() / 10_000.0
}

/// Log the end-of-run line with the job description and wall-clock time.
pub fn log_job_finished(description: &str, elapsed: Duration) {
    info!(
        job = %description,
        elapsed_secs = elapsed_secs(elapsed),
        "Scheduled job finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_rounded_to_four_places() {
        assert_eq!(elapsed_secs(Duration::from_micros(1_234_567)), 1.2346);
        assert_eq!(elapsed_secs(Duration::ZERO), 0.0);
    }

    #[test]
    fn event_display_names() {
        assert_eq!(NotificationEvent::ExpiresToday.to_string(), "expires_today");
        assert_eq!(NotificationEvent::ExpiringSoon.to_string(), "expiring_soon");
    }

    #[test]
    fn second_init_keeps_existing_subscriber() {
        let config = LoggingConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
