use std::env;
use std::process::ExitCode;

use tracing::{error, info};

use expiry_warden::cli::{parse_command, Command, USAGE};
use expiry_warden::config::WardenConfig;
use expiry_warden::errors::WardenResult;
use expiry_warden::jobs::run_warning_job;
use expiry_warden::logging::init_logging;
use expiry_warden::mail::SmtpMailer;
use expiry_warden::store::Database;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let command = match parse_command(&args) {
        Command::Help => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Command::Unknown(cmd) => {
            eprintln!("Unknown command: {cmd}\n\n{USAGE}");
            return ExitCode::from(2);
        }
        cmd => cmd,
    };

    let config = match WardenConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);

    let result = match command {
        Command::Schedule => schedule(config).await,
        _ => run_once(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Expiry warden failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_once(config: WardenConfig) -> WardenResult<()> {
    let db = Database::connect(&config.database).await?;
    let mailer = SmtpMailer::from_config(&config.smtp)?;

    let report = run_warning_job(&db, &mailer, &config.warning).await?;

    info!(
        "Expiration warnings: {} attempted ({} delivered, {} failed), {} skipped",
        report.attempted(),
        report.delivered,
        report.failed,
        report.skipped_invalid
    );

    Ok(())
}

#[cfg(feature = "scheduler")]
async fn schedule(config: WardenConfig) -> WardenResult<()> {
    use expiry_warden::jobs::JobScheduler;

    let db = Database::connect(&config.database).await?;
    info!("Connected to {} database", db.db_type());
    let mailer = SmtpMailer::from_config(&config.smtp)?;

    let mut scheduler = JobScheduler::new(db, mailer, config.warning, config.schedule).await?;
    scheduler.start().await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }

    scheduler.shutdown().await?;

    Ok(())
}

#[cfg(not(feature = "scheduler"))]
async fn schedule(_config: WardenConfig) -> WardenResult<()> {
    Err(expiry_warden::errors::WardenError::ConfigError(
        "scheduling support not compiled in. Enable the 'scheduler' feature.".to_string(),
    ))
}
