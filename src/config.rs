use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PLAN_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PLAN_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: String,
    pub plan_service_url: String,
    pub plan_service_timeout: Duration,
    pub data_dir: PathBuf,
    /// Keep everything in memory instead of under `data_dir`.
    pub ephemeral_storage: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")?;
        let plan_service_url = env::var("PLAN_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_PLAN_SERVICE_URL.to_string());
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        let timeout_secs = match env::var("PLAN_SERVICE_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("PLAN_SERVICE_TIMEOUT_SECS must be a whole number: {}", e)
            })?,
            Err(_) => DEFAULT_PLAN_TIMEOUT_SECS,
        };

        let ephemeral_storage = env::var("EPHEMERAL_STORAGE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            port,
            plan_service_url,
            plan_service_timeout: Duration::from_secs(timeout_secs),
            data_dir: PathBuf::from(data_dir),
            ephemeral_storage,
        })
    }
}
