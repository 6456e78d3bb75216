//! In-process cron scheduling for the warning job.

use chrono::Local;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler as TokioJobScheduler};
use tracing::{error, info};

use crate::config::{ScheduleConfig, WarningConfig};
use crate::mail::SmtpMailer;
use crate::store::Database;

use super::{run_warning_job, JobError};

/// Cron-driven runner for the expiration warning job.
pub struct JobScheduler {
    scheduler: TokioJobScheduler,
    db: Arc<Database>,
    mailer: Arc<SmtpMailer>,
    warning: Arc<WarningConfig>,
    schedule: ScheduleConfig,
}

impl JobScheduler {
    /// Create a new job scheduler.
    pub async fn new(
        db: Database,
        mailer: SmtpMailer,
        warning: WarningConfig,
        schedule: ScheduleConfig,
    ) -> Result<Self, JobError> {
        let scheduler = TokioJobScheduler::new()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        Ok(Self {
            scheduler,
            db: Arc::new(db),
            mailer: Arc::new(mailer),
            warning: Arc::new(warning),
            schedule,
        })
    }

    /// Register the warning job and start ticking.
    pub async fn start(&self) -> Result<(), JobError> {
        info!("Starting expiry warden scheduler");

        self.add_expire_warning_job().await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        info!("Expiry warden scheduler started successfully");

        Ok(())
    }

    /// Stop the job scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobError> {
        info!("Shutting down expiry warden scheduler");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;
        Ok(())
    }

    async fn add_expire_warning_job(&self) -> Result<(), JobError> {
        let db = Arc::clone(&self.db);
        let mailer = Arc::clone(&self.mailer);
        let warning = Arc::clone(&self.warning);

        let job = Job::new_async(self.schedule.cron.as_str(), move |_uuid, _l| {
            let db = Arc::clone(&db);
            let mailer = Arc::clone(&mailer);
            let warning = Arc::clone(&warning);
            Box::pin(async move {
                info!("Running expiration warning job at {}", Local::now().naive_local());

                // Failures never stop the scheduler; the next tick runs as usual.
                if let Err(e) = run_warning_job(&db, mailer.as_ref(), &warning).await {
                    error!("Expiration warning job failed: {}", e);
                }
            })
        })
        .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        info!(
            "Added expiration warning job (schedule: {})",
            self.schedule.cron
        );

        Ok(())
    }
}
