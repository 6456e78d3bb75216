//! Account expiration warning job.
//!
//! Scans every enabled account, works out how many calendar days remain
//! before it expires and mails a warning when the account expires today or
//! falls inside the configured warning window. Every delivery attempt is
//! recorded in `email_log`, whether the mail went out or not.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::config::WarningConfig;
use crate::logging::{log_notification_event, NotificationEvent};
use crate::mail::{Mailer, WarningMail, WarningTemplate, WARNING_TITLE};
use crate::store::{Account, Database, DeliveryStatus, NewNotificationLog};
use crate::validation::is_valid_email;

use super::JobError;

/// Description used in the end-of-run log line.
pub const JOB_DESCRIPTION: &str = "Warn users whose accounts are about to expire";

/// Where an account stands relative to the warning thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningClass {
    /// Expires at the end of the current day.
    ExpiresToday,
    /// Expires within the warning window.
    ExpiringSoon { days_left: i64 },
    /// Already expired, or expiry is beyond the window.
    Unaffected,
}

impl WarningClass {
    fn template(self) -> Option<WarningTemplate> {
        match self {
            WarningClass::ExpiresToday => Some(WarningTemplate::ExpireToday),
            WarningClass::ExpiringSoon { days_left } => {
                Some(WarningTemplate::ExpireInDays(days_left))
            }
            WarningClass::Unaffected => None,
        }
    }
}

/// Whole calendar days from `now` until `expire_time`.
///
/// Both instants are truncated to their date first, so the count only steps
/// down at midnight. Negative once the expiry day has passed.
pub fn days_left(expire_time: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (expire_time.date() - now.date()).num_days()
}

/// Classify an account expiry against `now` and the window length.
pub fn classify(expire_time: NaiveDateTime, now: NaiveDateTime, expire_days: u32) -> WarningClass {
    match days_left(expire_time, now) {
        0 => WarningClass::ExpiresToday,
        d if d > 0 && d <= i64::from(expire_days) => WarningClass::ExpiringSoon { days_left: d },
        _ => WarningClass::Unaffected,
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningReport {
    /// Enabled accounts read from the store
    pub scanned: u32,
    /// Accounts skipped because the login identifier is not an e-mail
    pub skipped_invalid: u32,
    pub expires_today: u32,
    pub expiring_soon: u32,
    /// Attempts logged as delivered
    pub delivered: u32,
    /// Attempts logged as failed
    pub failed: u32,
}

impl WarningReport {
    /// Number of delivery attempts (and log rows) in this pass.
    pub fn attempted(&self) -> u32 {
        self.delivered + self.failed
    }
}

/// Run one warning pass using the local wall clock.
pub async fn run_expire_warning<M: Mailer>(
    db: &Database,
    mailer: &M,
    config: &WarningConfig,
) -> Result<WarningReport, JobError> {
    run_expire_warning_at(db, mailer, config, Local::now().naive_local()).await
}

/// Run one warning pass as of `now`.
///
/// Returns immediately with an empty report when warnings are switched off.
/// Mail failures are logged and counted; database failures abort the pass.
pub async fn run_expire_warning_at<M: Mailer>(
    db: &Database,
    mailer: &M,
    config: &WarningConfig,
    now: NaiveDateTime,
) -> Result<WarningReport, JobError> {
    let mut report = WarningReport::default();

    if !config.expire_warning {
        debug!("Expiration warnings disabled, skipping");
        return Ok(report);
    }

    debug!(
        "Checking for accounts expiring within {} days at {}",
        config.expire_days, now
    );

    let accounts = db.get_enabled_accounts().await?;

    for account in accounts {
        report.scanned += 1;

        if !is_valid_email(&account.username) {
            debug!(
                "Skipping account {}: login is not an e-mail address",
                account.id
            );
            report.skipped_invalid += 1;
            continue;
        }

        let class = classify(account.expire_time, now, config.expire_days);
        let Some(template) = class.template() else {
            continue;
        };

        match class {
            WarningClass::ExpiresToday => report.expires_today += 1,
            WarningClass::ExpiringSoon { .. } => report.expiring_soon += 1,
            WarningClass::Unaffected => {}
        }

        let status = notify(db, mailer, config, &account, template, now).await?;
        match status {
            DeliveryStatus::Delivered => report.delivered += 1,
            DeliveryStatus::Failed => report.failed += 1,
        }
    }

    info!(
        scanned = report.scanned,
        delivered = report.delivered,
        failed = report.failed,
        "Expiration warning pass complete"
    );

    Ok(report)
}

/// Send one warning and record the attempt.
async fn notify<M: Mailer>(
    db: &Database,
    mailer: &M,
    config: &WarningConfig,
    account: &Account,
    template: WarningTemplate,
    now: NaiveDateTime,
) -> Result<DeliveryStatus, JobError> {
    let (event, days) = match template {
        WarningTemplate::ExpireToday => (NotificationEvent::ExpiresToday, 0),
        WarningTemplate::ExpireInDays(d) => (NotificationEvent::ExpiringSoon, d),
    };
    let content = template.log_content();
    let mail = WarningMail::new(template, &config.website_name);

    let entry = match mailer.send(&account.username, &mail).await {
        Ok(()) => {
            log_notification_event(event, account.id, days, DeliveryStatus::Delivered, None);
            NewNotificationLog::delivered(account.id, WARNING_TITLE, &content, now)
        }
        Err(e) => {
            let message = e.to_string();
            log_notification_event(
                event,
                account.id,
                days,
                DeliveryStatus::Failed,
                Some(&message),
            );
            NewNotificationLog::failed(account.id, WARNING_TITLE, &content, &message, now)
        }
    };

    db.insert_notification_log(&entry).await?;

    Ok(entry.status)
}
