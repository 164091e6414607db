use prometheus::{GaugeVec, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;

pub const NAMESPACE: &str = "timechef";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Exported balance
    pub solde: GaugeVec,

    // Scrape-time fetch
    pub fetch_failures: IntCounterVec,
    pub fetch_duration: Histogram,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        info!("Initializing Metrics ...");
        let registry = Registry::new_custom(Some(NAMESPACE.into()), None)?;

        let metrics = Self {
            solde: GaugeVec::new(Opts::new("solde", "Remaining money on Timechef's account"), &["site"])?,

            fetch_failures: IntCounterVec::new(Opts::new("fetch_failures_total", "Balance fetch failures by reason"), &["reason"])?,
            fetch_duration: Histogram::with_opts(HistogramOpts::new("fetch_duration_seconds", "Balance fetch duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]))?,

            up: IntGauge::new("up", "1 if the exporter is serving")?,

            registry,
        };

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.solde.clone()))?;
        reg.register(Box::new(metrics.fetch_failures.clone()))?;
        reg.register(Box::new(metrics.fetch_duration.clone()))?;
        reg.register(Box::new(metrics.up.clone()))?;

        Ok(metrics)
    }
}
