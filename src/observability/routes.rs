use std::sync::Arc;

use crate::helpers::time::get_instant;
use crate::observability::metrics::Metrics;
use crate::server::server::AppState;
use crate::sources::fetcher::{BalanceFetcher, FetchResult};
use axum::response::Response;
use axum::routing::get;
use axum::{extract::State, response::IntoResponse, Router};
use http::{header::CONTENT_TYPE, StatusCode};
use prometheus::{Encoder, TextEncoder};
use tokio::sync::Mutex;
use tracing::{error, warn};

#[derive(Clone)]
pub struct MetricsState {
    pub metrics: Metrics,
    /// one fetch at a time, so overlapping scrapes never race on a refresh
    pub fetcher: Arc<Mutex<BalanceFetcher>>,
}

impl MetricsState {
    pub fn new(metrics: Metrics, fetcher: BalanceFetcher) -> Self {
        Self {
            metrics,
            fetcher: Arc::new(Mutex::new(fetcher)),
        }
    }

    pub fn router(&self, path: &str) -> Router<AppState> {
        Router::new().route(path, get(get_metrics))
    }

    /// Fetches the balance, updates the gauge and encodes the registry.
    /// A failed fetch drops the balance series for this scrape instead of failing it.
    pub async fn scrape(&self) -> prometheus::Result<String> {
        let mut fetcher = self.fetcher.lock().await;

        let start = get_instant();
        let result = fetcher.fetch().await;
        self.metrics.fetch_duration.observe(start.elapsed().as_secs_f64());
        self.record(result);

        let encoder = TextEncoder::new();
        let metric_families = self.metrics.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    fn record(&self, result: Result<FetchResult, crate::errors::FetchError>) {
        self.metrics.solde.reset();
        match result {
            Ok(reading) => {
                self.metrics
                    .solde
                    .with_label_values(&[reading.site.as_str()])
                    .set(reading.balance);
            }
            Err(e) => {
                self.metrics.fetch_failures.with_label_values(&[e.reason()]).inc();
                warn!(reason = e.reason(), auth = e.is_auth(), "Could not fetch the Timechef metrics; {}", e);
            }
        }
    }
}

async fn get_metrics(State(state): State<AppState>) -> Response {
    match state.metrics_state.scrape().await {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
