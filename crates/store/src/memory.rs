//! In-memory store backends.
//!
//! Ads and campaigns live in `DashMap`s keyed by ID with a monotonically
//! increasing ID counter; clicks go into an append-only `Vec` behind an
//! `RwLock`. Concurrent click appends during an aggregation run are
//! acceptable to miss in that run's count — the next run picks them up.

use ads_core::types::{AdClick, Advertisement, Campaign, EntityId};
use ads_core::AdsResult;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::{AdvertisementStore, CampaignStore, ClickEventStore};

pub struct MemoryAdStore {
    ads: DashMap<EntityId, Advertisement>,
    next_id: AtomicU64,
}

impl MemoryAdStore {
    pub fn new() -> Self {
        Self {
            ads: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl AdvertisementStore for MemoryAdStore {
    async fn find_all(&self) -> AdsResult<Vec<Advertisement>> {
        let mut ads: Vec<_> = self.ads.iter().map(|e| e.value().clone()).collect();
        ads.sort_by_key(|ad| ad.id);
        Ok(ads)
    }

    async fn find_by_id(&self, id: EntityId) -> AdsResult<Option<Advertisement>> {
        Ok(self.ads.get(&id).map(|e| e.value().clone()))
    }

    async fn save(&self, mut ad: Advertisement) -> AdsResult<Advertisement> {
        if ad.id == 0 {
            ad.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        }
        self.ads.insert(ad.id, ad.clone());
        Ok(ad)
    }

    async fn save_all(&self, ads: Vec<Advertisement>) -> AdsResult<()> {
        for ad in ads {
            self.ads.insert(ad.id, ad);
        }
        Ok(())
    }
}

pub struct MemoryCampaignStore {
    campaigns: DashMap<EntityId, Campaign>,
    next_id: AtomicU64,
}

impl MemoryCampaignStore {
    pub fn new() -> Self {
        Self {
            campaigns: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    async fn find_all(&self) -> AdsResult<Vec<Campaign>> {
        let mut campaigns: Vec<_> = self.campaigns.iter().map(|e| e.value().clone()).collect();
        campaigns.sort_by_key(|c| c.id);
        Ok(campaigns)
    }

    async fn save(&self, mut campaign: Campaign) -> AdsResult<Campaign> {
        if campaign.id == 0 {
            campaign.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        }
        self.campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign)
    }
}

#[derive(Default)]
pub struct MemoryClickStore {
    clicks: RwLock<Vec<AdClick>>,
}

impl MemoryClickStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the full event log, in append order.
    pub fn events(&self) -> Vec<AdClick> {
        self.clicks.read().clone()
    }
}

#[async_trait]
impl ClickEventStore for MemoryClickStore {
    async fn append(&self, click: AdClick) -> AdsResult<()> {
        self.clicks.write().push(click);
        Ok(())
    }

    async fn count_by_ad_id(&self, ad_id: EntityId) -> AdsResult<u64> {
        Ok(self.clicks.read().iter().filter(|c| c.ad_id == ad_id).count() as u64)
    }
}
