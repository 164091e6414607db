//! Configuration validation with aggregated errors.
//! Every issue is collected so a broken config is reported in one go.

use std::time::Duration;

use chrono::TimeDelta;
use reqwest::Url;
use tracing::{error, info};

use crate::config::settings::{LoggingConfig, ServiceConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.user.trim().is_empty() {
        errors.push("config: 'user' must not be empty".to_string());
    }
    if cfg.password.is_empty() {
        errors.push("config: 'password' must not be empty".to_string());
    }

    // doubles as the refresh margin, so it must be a usable duration
    match Duration::try_from_secs_f64(cfg.timeout) {
        Ok(timeout) if !timeout.is_zero() && TimeDelta::from_std(timeout).is_ok() => {}
        _ => errors.push(format!(
            "config: 'timeout' ({}) must be a positive number of seconds that fits a duration",
            cfg.timeout
        )),
    }

    match Url::parse(&cfg.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "config: 'base_url' scheme '{}' is not http(s)",
            url.scheme()
        )),
        Err(e) => errors.push(format!("config: 'base_url' '{}' is invalid: {}", cfg.base_url, e)),
    }

    if cfg.listen.is_empty() || !cfg.listen.contains(':') {
        errors.push(format!(
            "config: 'listen' '{}' must look like 'host:port' or ':port'",
            cfg.listen
        ));
    }

    if !cfg.metrics_path.starts_with('/') {
        errors.push(format!(
            "config: 'metrics_path' '{}' must start with '/'",
            cfg.metrics_path
        ));
    }

    if let Some(logging) = &cfg.logging {
        validate_logging(logging, &mut errors);
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        error!("config is not valid, total errors: {}", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "config: 'logging.level' '{}' must be one of {}",
            logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
}
