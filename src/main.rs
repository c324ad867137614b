use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

use sheet_replicator::adapters::config::app_config::AppConfig;
use sheet_replicator::adapters::process_guard::{ProcessGuard, ProcessGuardError};
use sheet_replicator::adapters::sheets::sheets_client::GoogleSheetsClient;
use sheet_replicator::application::executor::RetryPolicy;
use sheet_replicator::application::replication::{ReplicationRoutine, ReplicationSettings};
use sheet_replicator::ports::routine::Routine;

#[derive(Parser, Debug)]
#[command(
    name = "sheet-replicator",
    version,
    about = "Replicates cell ranges between spreadsheets from a tabular task configuration"
)]
struct Cli {
    /// Sheet ID of the configuration spreadsheet
    #[arg(long)]
    id: String,

    /// Path to the OAuth client secret JSON file
    #[arg(long)]
    auth: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration loading failed")]
    Config,
    #[error("Authentication failed")]
    Auth,
    #[error("Replication run failed")]
    Run,
}

#[tokio::main]
async fn main() -> error_stack::Result<(), AppError> {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level);

    let config = AppConfig::load().map_err(|report| report.change_context(AppError::Config))?;

    let _guard = match ProcessGuard::acquire(Path::new(&config.lock_file)) {
        Ok(guard) => guard,
        Err(report)
            if matches!(report.current_context(), ProcessGuardError::AlreadyRunning) =>
        {
            info!("Another instance is already running, nothing to do");
            return Ok(());
        }
        Err(report) => return Err(report.change_context(AppError::Run)),
    };

    let credentials_file = cli
        .auth
        .unwrap_or_else(|| PathBuf::from(&config.credentials_file));
    let service = GoogleSheetsClient::new(&credentials_file, Path::new(&config.token_cache_file))
        .await
        .map_err(|report| report.change_context(AppError::Auth))?;

    let settings = ReplicationSettings {
        config_spreadsheet_id: cli.id,
        configuration_range: config.configuration_range,
        errors_sheet: config.errors_sheet,
        retry: RetryPolicy {
            backoff: Duration::from_secs(config.quota_backoff_secs),
            max_retries: config.quota_max_retries,
        },
    };
    let routine = ReplicationRoutine::new(service, settings);

    match routine.run().await {
        Ok(()) => {
            info!("✅ {}: OK", routine.name());
            Ok(())
        }
        Err(report) => {
            error!("❌ {}: {:?}", routine.name(), report);
            Err(report.change_context(AppError::Run))
        }
    }
}

fn setup_tracing(log_level: &str) {
    let level = log_level.parse().unwrap_or(tracing::Level::INFO);

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_default(tracing::Level::WARN)
                .with_target("sheet_replicator", level),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
