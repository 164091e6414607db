use std::time::Duration;

use serde::Deserialize;

use crate::sources::endpoints::DEFAULT_BASE_URL;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    pub user: String,
    pub password: String,
    /// request timeout in seconds, also used as the token refresh margin
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
    pub logging: Option<LoggingConfig>,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// `:9091` style addresses bind every interface.
    pub fn listen_addr(&self) -> String {
        match self.listen.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.listen.to_owned(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_listen() -> String {
    ":9091".to_string()
}

fn default_timeout() -> f64 {
    10.0
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
