use ads_core::types::{AdClick, Advertisement, Campaign, EntityId};
use ads_core::AdsResult;
use async_trait::async_trait;

/// Durable mutable store for advertisements.
///
/// `save` assigns an ID when the record carries `id == 0`; `save_all` is a
/// bulk overwrite used by the aggregator so that the counts it writes land
/// as one update per advertisement, never a partially-applied row.
#[async_trait]
pub trait AdvertisementStore: Send + Sync {
    async fn find_all(&self) -> AdsResult<Vec<Advertisement>>;
    async fn find_by_id(&self, id: EntityId) -> AdsResult<Option<Advertisement>>;
    async fn save(&self, ad: Advertisement) -> AdsResult<Advertisement>;
    async fn save_all(&self, ads: Vec<Advertisement>) -> AdsResult<()>;
}

/// Durable mutable store for campaigns.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn find_all(&self) -> AdsResult<Vec<Campaign>>;
    async fn save(&self, campaign: Campaign) -> AdsResult<Campaign>;
}

/// Durable append-only store for click events.
///
/// Events are never updated or deleted; the only read the engine needs is
/// the per-advertisement total.
#[async_trait]
pub trait ClickEventStore: Send + Sync {
    async fn append(&self, click: AdClick) -> AdsResult<()>;
    async fn count_by_ad_id(&self, ad_id: EntityId) -> AdsResult<u64>;
}
