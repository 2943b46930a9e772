//! Aggregate A/B statistics over the persisted catalog.

use ads_core::types::EntityId;
use ads_core::AdsResult;
use ads_store::{AdvertisementStore, CampaignStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Group label reported for ads without a persisted assignment.
const UNASSIGNED: &str = "unassigned";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbStats {
    pub total_ads: usize,
    /// Counts keyed by the *persisted* group, not the per-request resolved
    /// one; `"unassigned"` collects ads with no assignment.
    pub by_group: HashMap<String, u64>,
    /// Campaigns with at least one associated ad.
    pub campaigns: Vec<CampaignAdCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignAdCount {
    pub id: EntityId,
    pub name: String,
    pub ad_count: u64,
}

pub struct AbStatsService {
    ads: Arc<dyn AdvertisementStore>,
    campaigns: Arc<dyn CampaignStore>,
}

impl AbStatsService {
    pub fn new(ads: Arc<dyn AdvertisementStore>, campaigns: Arc<dyn CampaignStore>) -> Self {
        Self { ads, campaigns }
    }

    pub async fn stats(&self) -> AdsResult<AbStats> {
        let all_ads = self.ads.find_all().await?;

        let mut by_group: HashMap<String, u64> = HashMap::new();
        for ad in &all_ads {
            let key = ad
                .ab_group
                .map(|g| g.as_str().to_string())
                .unwrap_or_else(|| UNASSIGNED.to_string());
            *by_group.entry(key).or_insert(0) += 1;
        }

        let campaigns = self
            .campaigns
            .find_all()
            .await?
            .into_iter()
            .filter_map(|campaign| {
                let ad_count = all_ads
                    .iter()
                    .filter(|ad| ad.campaign_id == Some(campaign.id))
                    .count() as u64;
                (ad_count > 0).then_some(CampaignAdCount {
                    id: campaign.id,
                    name: campaign.name,
                    ad_count,
                })
            })
            .collect();

        Ok(AbStats {
            total_ads: all_ads.len(),
            by_group,
            campaigns,
        })
    }
}
