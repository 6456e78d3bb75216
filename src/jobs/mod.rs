//! Scheduled jobs for the expiry warden.
//!
//! # Available Jobs
//!
//! - **Expiration Warning**: mails users whose accounts expire today or within
//!   the configured window, and records each attempt in `email_log`
//!
//! The job can run once (`expiry_warden run`, e.g. from a system timer) or on
//! a cron schedule inside the process (`expiry_warden schedule`, requires the
//! `scheduler` feature).
//!
//! # Usage
//!
//! ```rust,ignore
//! use expiry_warden::jobs::{JobScheduler, run_warning_job};
//!
//! let report = run_warning_job(&db, &mailer, &config.warning).await?;
//!
//! let scheduler = JobScheduler::new(db, mailer, config.warning, config.schedule).await?;
//! scheduler.start().await?;
//! ```

use std::time::Instant;

use crate::config::WarningConfig;
use crate::logging::log_job_finished;
use crate::mail::Mailer;
use crate::store::Database;

mod expire_warning;

pub use expire_warning::{
    classify, days_left, run_expire_warning, run_expire_warning_at, WarningClass, WarningReport,
    JOB_DESCRIPTION,
};

#[cfg(feature = "scheduler")]
mod scheduler;

#[cfg(feature = "scheduler")]
pub use scheduler::JobScheduler;

/// Run one timed warning pass and log the end-of-run line.
///
/// The timing line is written whether the pass succeeds or not.
pub async fn run_warning_job<M: Mailer>(
    db: &Database,
    mailer: &M,
    config: &WarningConfig,
) -> Result<WarningReport, JobError> {
    let started = Instant::now();
    let result = run_expire_warning(db, mailer, config).await;
    log_job_finished(JOB_DESCRIPTION, started.elapsed());
    result
}

/// Errors that can occur while running jobs.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Scheduler error: {0}")]
    SchedulerError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Job execution error: {0}")]
    ExecutionError(String),
}

impl From<crate::errors::WardenError> for JobError {
    fn from(err: crate::errors::WardenError) -> Self {
        match err {
            crate::errors::WardenError::DatabaseError(msg) => JobError::DatabaseError(msg),
            other => JobError::ExecutionError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WardenError;

    #[test]
    fn database_errors_stay_database_errors() {
        let err: JobError = WardenError::DatabaseError("gone".to_string()).into();
        assert!(matches!(err, JobError::DatabaseError(ref m) if m == "gone"));
    }

    #[test]
    fn other_errors_become_execution_errors() {
        let err: JobError = WardenError::ConfigError("bad".to_string()).into();
        assert!(matches!(err, JobError::ExecutionError(_)));
    }
}
