//! Demo catalog seeding.
//!
//! Creates three advertisements and three campaigns positioned around the
//! current date: one active, one already ended, one not yet started. The
//! ended and future campaigns exist so the eligibility filter has something
//! to exclude out of the box.

use ads_core::types::{Advertisement, Campaign};
use ads_core::AdsResult;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::traits::{AdvertisementStore, CampaignStore};

/// Seed the demo catalog. No-op when the ad store already has records, so
/// restarting the service never duplicates the catalog.
pub async fn seed_catalog(
    ads: &Arc<dyn AdvertisementStore>,
    campaigns: &Arc<dyn CampaignStore>,
) -> AdsResult<()> {
    if !ads.find_all().await?.is_empty() {
        info!("Ad store already populated, skipping seed");
        return Ok(());
    }

    let discount_clothing = ads
        .save(new_ad("Discount Clothing", "1.jpg", "/discount-clothing"))
        .await?;
    let cool_hats = ads.save(new_ad("Cool Hats", "2.jpg", "/cool-hats")).await?;
    let nice_bags = ads.save(new_ad("Nice Bags", "3.jpg", "/nice-bags")).await?;

    let today = Utc::now().date_naive();

    let summer_hats = campaigns
        .save(Campaign {
            id: 0,
            name: "Summer Hats".to_string(),
            start_date: today - Duration::days(30),
            end_date: today + Duration::days(60),
            budget_cents: 50_000,
            target_taxon: "hats".to_string(),
        })
        .await?;
    let winter_clearance = campaigns
        .save(Campaign {
            id: 0,
            name: "Winter Clearance".to_string(),
            start_date: today - Duration::days(60),
            end_date: today - Duration::days(1),
            budget_cents: 30_000,
            target_taxon: "clothing".to_string(),
        })
        .await?;
    let spring_bags = campaigns
        .save(Campaign {
            id: 0,
            name: "Spring Bags".to_string(),
            start_date: today + Duration::days(1),
            end_date: today + Duration::days(90),
            budget_cents: 40_000,
            target_taxon: "bags".to_string(),
        })
        .await?;

    for (mut ad, campaign_id) in [
        (cool_hats, summer_hats.id),
        (discount_clothing, winter_clearance.id),
        (nice_bags, spring_bags.id),
    ] {
        ad.campaign_id = Some(campaign_id);
        ads.save(ad).await?;
    }

    info!("Seeded 3 advertisements and 3 campaigns (active, ended, not started)");
    Ok(())
}

fn new_ad(name: &str, path: &str, click_url: &str) -> Advertisement {
    Advertisement {
        id: 0,
        name: name.to_string(),
        path: path.to_string(),
        click_url: click_url.to_string(),
        campaign_id: None,
        ab_group: None,
        click_count: 0,
    }
}
