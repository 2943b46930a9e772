//! Ad selection: eligibility filtering plus experiment-group stamping.

use ads_core::types::{AbGroup, ServedAd};
use ads_core::{eligibility, experiment, AdsResult};
use ads_store::{AdvertisementStore, CampaignStore};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Answers "what do we serve for this request".
///
/// Works on a read snapshot fetched from the stores at call start; holds no
/// mutable state of its own, so concurrent calls need no synchronization.
pub struct AdSelectionService {
    ads: Arc<dyn AdvertisementStore>,
    campaigns: Arc<dyn CampaignStore>,
}

impl AdSelectionService {
    pub fn new(ads: Arc<dyn AdvertisementStore>, campaigns: Arc<dyn CampaignStore>) -> Self {
        Self { ads, campaigns }
    }

    /// Resolve the group for a session: empty session defaults to `control`,
    /// anything else goes through the deterministic assigner.
    pub fn resolve_group(session_id: &str) -> AbGroup {
        if session_id.is_empty() {
            AbGroup::Control
        } else {
            experiment::assign(session_id)
        }
    }

    /// Select the ads to serve, each stamped with the resolved group.
    ///
    /// When eligibility filtering empties a non-empty catalog, the full
    /// unfiltered catalog is served instead — a fully-expired catalog must
    /// never produce a zero-ad response.
    pub async fn select(&self, session_id: &str) -> AdsResult<Vec<ServedAd>> {
        let group = Self::resolve_group(session_id);
        let today = Utc::now().date_naive();

        let all_ads = self.ads.find_all().await?;
        let campaigns_by_id: HashMap<_, _> = self
            .campaigns
            .find_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let filtered = eligibility::filter(&all_ads, &campaigns_by_id, today);
        let served = if filtered.is_empty() && !all_ads.is_empty() {
            warn!(
                total = all_ads.len(),
                "No ads passed campaign filter, serving full catalog as fallback"
            );
            all_ads.clone()
        } else {
            filtered
        };

        info!(
            total = all_ads.len(),
            served = served.len(),
            session_id = if session_id.is_empty() { "(none)" } else { session_id },
            ab_group = %group,
            "Ad selection complete"
        );

        Ok(served
            .into_iter()
            .map(|ad| ServedAd {
                ad,
                resolved_ab_group: group,
            })
            .collect())
    }
}
