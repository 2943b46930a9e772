//! Periodic click-count reconciliation.

use ads_store::{AdvertisementStore, ClickEventStore};
use ads_core::AdsResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Recomputes every advertisement's click-count snapshot from the event log
/// on a fixed delay.
///
/// The delay is measured from the end of the previous run, so a slow run
/// postpones the next one but runs never overlap. The aggregator is the sole
/// writer of click-count snapshots; clicks appended while a run is counting
/// are picked up on the next tick.
pub struct ClickAggregator {
    ads: Arc<dyn AdvertisementStore>,
    clicks: Arc<dyn ClickEventStore>,
    interval: Duration,
}

impl ClickAggregator {
    pub fn new(
        ads: Arc<dyn AdvertisementStore>,
        clicks: Arc<dyn ClickEventStore>,
        interval: Duration,
    ) -> Self {
        Self {
            ads,
            clicks,
            interval,
        }
    }

    /// Run the reconciliation loop forever. The first pass fires right
    /// away so counts are fresh from boot; each later pass waits the full
    /// interval after the previous one finished. A failed run is logged and
    /// the next tick still fires; nothing here is fatal to the process.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Click aggregator started");
        loop {
            match self.run_once().await {
                Ok(count) => {
                    metrics::counter!("aggregation.runs").increment(1);
                    info!(ads = count, "Aggregated click counts");
                }
                Err(e) => {
                    metrics::counter!("aggregation.failures").increment(1);
                    error!(error = %e, "Failed to aggregate click counts");
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One reconciliation pass: count events per advertisement and persist
    /// all snapshots in a single bulk write. Idempotent — with no new clicks
    /// a second pass rewrites identical values.
    pub async fn run_once(&self) -> AdsResult<usize> {
        let mut ads = self.ads.find_all().await?;
        for ad in &mut ads {
            ad.click_count = self.clicks.count_by_ad_id(ad.id).await?;
        }
        let count = ads.len();
        self.ads.save_all(ads).await?;
        Ok(count)
    }
}
