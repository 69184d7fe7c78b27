use std::env;
use std::time::Duration;

/// Default per-request timeout for MLflow calls
pub const DEFAULT_MLFLOW_TIMEOUT_SECS: u64 = 10;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// MLflow tracking server; tracking is disabled when unset
    pub mlflow_tracking_uri: Option<String>,
    pub mlflow_experiment_id: String,
    pub mlflow_timeout: Duration,
    /// Bearer key required on mutating routes when set
    pub api_key: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://neura_orchestra.db?mode=rwc".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            mlflow_tracking_uri: None,
            mlflow_experiment_id: "0".to_string(),
            mlflow_timeout: Duration::from_secs(DEFAULT_MLFLOW_TIMEOUT_SECS),
            api_key: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            mlflow_tracking_uri: var("MLFLOW_TRACKING_URI"),
            mlflow_experiment_id: var("MLFLOW_EXPERIMENT_ID")
                .unwrap_or(defaults.mlflow_experiment_id),
            mlflow_timeout: var("MLFLOW_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&secs: &u64| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.mlflow_timeout),
            api_key: var("API_KEY"),
            log_format: match var("LOG_FORMAT").as_deref() {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }
}
