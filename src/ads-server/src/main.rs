//! Ads service — campaign-aware ad serving with A/B assignment and
//! periodic click-count reconciliation.
//!
//! Main entry point that wires the stores, services, and background
//! aggregation task, then starts the HTTP server.

use ads_api::{ApiServer, AppState};
use ads_core::config::AppConfig;
use ads_serving::{AbStatsService, AdSelectionService, ClickAggregator, ClickRecorder};
use ads_store::{
    seed, AdvertisementStore, CampaignStore, ClickEventStore, MemoryAdStore, MemoryCampaignStore,
    MemoryClickStore,
};
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ads-server")]
#[command(about = "Campaign-aware ad serving with A/B assignment and click aggregation")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "ADS_SERVER__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "ADS_SERVER__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Seconds between click-aggregation runs (overrides config)
    #[arg(long, env = "ADS_SERVER__AGGREGATION__INTERVAL_SECS")]
    aggregation_interval_secs: Option<u64>,

    /// Skip seeding the demo catalog
    #[arg(long, default_value_t = false)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ads_server=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Ads service starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(secs) = cli.aggregation_interval_secs {
        config.aggregation.interval_secs = secs;
    }
    if cli.no_seed {
        config.seed = false;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        aggregation_interval_secs = config.aggregation.interval_secs,
        "Configuration loaded"
    );

    let ads: Arc<dyn AdvertisementStore> = Arc::new(MemoryAdStore::new());
    let campaigns: Arc<dyn CampaignStore> = Arc::new(MemoryCampaignStore::new());
    let clicks: Arc<dyn ClickEventStore> = Arc::new(MemoryClickStore::new());

    if config.seed {
        seed::seed_catalog(&ads, &campaigns).await?;
    }

    let selection = Arc::new(AdSelectionService::new(ads.clone(), campaigns.clone()));
    let recorder = Arc::new(ClickRecorder::new(ads.clone(), clicks.clone()));
    let stats = Arc::new(AbStatsService::new(ads.clone(), campaigns.clone()));

    let aggregator = ClickAggregator::new(
        ads.clone(),
        clicks.clone(),
        Duration::from_secs(config.aggregation.interval_secs),
    );
    tokio::spawn(aggregator.run());

    let state = AppState {
        selection,
        recorder,
        stats,
        ads,
        campaigns,
        node_id: config.node_id.clone(),
        start_time: Instant::now(),
    };

    let server = ApiServer::new(config, state);
    server.start_metrics().await?;
    server.start_http().await?;

    Ok(())
}
