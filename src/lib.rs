//! # Timechef Exporter Library
//!
//! Polls the Timechef account-balance API and exposes the balance
//! as a Prometheus gauge.
//!
//! Modules:
//! - `config` — service configuration loading and validation
//! - `sources` — OAuth session lifecycle and balance fetching
//! - `observability` — metrics registry and scrape route
//! - `server` — HTTP server hosting the scrape endpoint

pub mod config;
pub mod errors;
pub mod sources;
pub mod tests;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;


pub use crate::config::settings::ServiceConfig;
pub use crate::errors::FetchError;
