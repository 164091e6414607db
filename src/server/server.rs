use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::observability::metrics::Metrics;
use crate::observability::routes::MetricsState;
use crate::sources::fetcher::BalanceFetcher;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(metrics: Metrics, fetcher: BalanceFetcher) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics, fetcher),
        }
    }

    pub fn router(&self, metrics_path: &str) -> Router {
        Router::new()
            .merge(self.metrics_state.router(metrics_path))
            .with_state(self.clone())
    }
}

/// Serve the scrape endpoint on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState, metrics_path: &str) -> Result<()> {
    let app = state.router(metrics_path);
    state.metrics_state.metrics.up.set(1);
    axum::serve(listener, app).await.context("metrics server failed")
}

pub async fn start(listen_addr: &str, state: AppState, metrics_path: &str) -> Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("cannot listen on {}", listen_addr))?;
    info!("address: {}, metrics path: {}", listen_addr, metrics_path);
    serve(listener, state, metrics_path).await
}
