use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use timechef_exporter::config::proc_loader::file_to_config;
use timechef_exporter::observability::metrics::Metrics;
use timechef_exporter::server::server::{self, AppState};
use timechef_exporter::sources::endpoints::Endpoints;
use timechef_exporter::sources::request::ApiClient;
use timechef_exporter::sources::{BalanceFetcher, Credentials};
use timechef_exporter::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML or JSON config file
    #[arg(env = "CONFIG", default_value = "timechef-exporter.yaml")]
    config: PathBuf,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config, start logging
    // -------------------------------

    let args = Args::parse();
    let service_config = file_to_config(&args.config)?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Authenticate and resolve the account site
    //
    // the request timeout doubles as the token refresh margin
    // -------------------------------

    let timeout = service_config.timeout();
    let client = ApiClient::new(timeout, Endpoints::new(&service_config.base_url))
        .context("cannot build HTTP client")?;
    let credentials = Credentials::new(&service_config.user, &service_config.password);
    let fetcher = BalanceFetcher::connect(client, credentials, timeout)
        .await
        .context("could not initialize Timechef")?;

    // -------------------------------
    // 3. Serve metrics
    // -------------------------------

    let metrics = Metrics::new().context("cannot register metrics")?;
    let state = AppState::new(metrics, fetcher);
    info!("Service starting...");
    server::start(&service_config.listen_addr(), state, &service_config.metrics_path).await
}
