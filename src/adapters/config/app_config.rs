use config::Config;
use error_stack::ResultExt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("Failed to load application configuration")]
    Load,
}

/// Run parameters that are not task data: where the configuration table and
/// the error report live, where local artifacts go, and the quota policy.
/// Defaults cover every field; an optional config file and
/// `SHEET_REPLICATOR_*` environment variables override them.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub configuration_range: String,
    pub errors_sheet: String,
    pub credentials_file: String,
    pub token_cache_file: String,
    pub lock_file: String,
    pub quota_backoff_secs: u64,
    pub quota_max_retries: u32,
}

impl AppConfig {
    pub fn load() -> error_stack::Result<Self, AppConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "Replicator".to_string());
        build(&config_path)
            .change_context(AppConfigError::Load)
            .attach_printable_lazy(|| format!("config file: {config_path}"))
    }
}

fn build(config_path: &str) -> Result<AppConfig, config::ConfigError> {
    let default_lock_file = std::env::temp_dir()
        .join("sheet-replicator.lock")
        .to_string_lossy()
        .into_owned();

    Config::builder()
        .set_default("configuration_range", "Configuration!A1:Z50")?
        .set_default("errors_sheet", "Errors")?
        .set_default("credentials_file", "credentials.json")?
        .set_default("token_cache_file", "tokencache.json")?
        .set_default("lock_file", default_lock_file)?
        .set_default("quota_backoff_secs", 100u64)?
        .set_default("quota_max_retries", 10u64)?
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("SHEET_REPLICATOR"))
        .build()?
        .try_deserialize::<AppConfig>()
}
