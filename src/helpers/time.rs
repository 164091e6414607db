use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use tokio::time::Instant;

use crate::errors::FetchError;

/// Fixed layout of the `expires` field returned by the OAuth endpoints,
/// e.g. `2024-01-01T10:00:00.0000000Z`.
pub const EXPIRES_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn parse_expires(value: &str) -> Result<DateTime<Utc>, FetchError> {
    NaiveDateTime::parse_from_str(value, EXPIRES_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| FetchError::TimestampParse {
            value: value.to_owned(),
            source,
        })
}

pub fn to_time_delta(margin: std::time::Duration) -> Result<TimeDelta, FetchError> {
    TimeDelta::from_std(margin).map_err(|_| FetchError::InvalidMargin(margin))
}

pub fn get_instant() -> Instant {
    Instant::now()
}
