//! Click recording with denormalized snapshots.

use ads_core::types::{AbGroup, AdClick, EntityId};
use ads_core::{experiment, AdsError, AdsResult};
use ads_store::{AdvertisementStore, ClickEventStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Landing path used when an advertisement has no click-through URL.
const DEFAULT_LANDING: &str = "/";

/// Where to send the caller after a recorded click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub redirect_to: String,
    pub ab_group: AbGroup,
}

/// Appends one click event per recorded click and decides the redirect
/// target. The event append completes before the outcome is returned; an
/// append failure propagates instead of being swallowed.
pub struct ClickRecorder {
    ads: Arc<dyn AdvertisementStore>,
    clicks: Arc<dyn ClickEventStore>,
}

impl ClickRecorder {
    pub fn new(ads: Arc<dyn AdvertisementStore>, clicks: Arc<dyn ClickEventStore>) -> Self {
        Self { ads, clicks }
    }

    /// Record a click on `ad_id` for the given (possibly empty) session.
    ///
    /// Group resolution differs from selection in its second tier: with no
    /// session ID, the advertisement's *persisted* group wins over the
    /// `control` default, so a previously-assigned ad keeps reporting under
    /// its own group.
    pub async fn record(&self, ad_id: EntityId, session_id: &str) -> AdsResult<ClickOutcome> {
        let ad = self
            .ads
            .find_by_id(ad_id)
            .await?
            .ok_or(AdsError::AdNotFound(ad_id))?;

        let ab_group = if session_id.is_empty() {
            ad.ab_group.unwrap_or(AbGroup::Control)
        } else {
            experiment::assign(session_id)
        };

        // Snapshot the campaign association as of right now; a later
        // reassignment must not change what this event says.
        let click = AdClick::new(ad.id, ad.campaign_id, Some(ab_group));
        self.clicks.append(click).await?;
        metrics::counter!("clicks.recorded").increment(1);
        info!(
            ad_id = ad.id,
            campaign_id = ?ad.campaign_id,
            ab_group = %ab_group,
            "Click tracked"
        );

        let redirect_to = if ad.click_url.is_empty() {
            warn!(ad_id = ad.id, "No click URL set, redirecting to landing page");
            DEFAULT_LANDING.to_string()
        } else {
            ad.click_url
        };

        Ok(ClickOutcome {
            redirect_to,
            ab_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ads_core::types::Advertisement;
    use ads_store::{MemoryAdStore, MemoryClickStore};
    use async_trait::async_trait;

    /// Click store whose append always fails.
    struct BrokenAppendStore;

    #[async_trait]
    impl ClickEventStore for BrokenAppendStore {
        async fn append(&self, _click: AdClick) -> AdsResult<()> {
            Err(AdsError::Store("click store unavailable".to_string()))
        }

        async fn count_by_ad_id(&self, _ad_id: EntityId) -> AdsResult<u64> {
            Ok(0)
        }
    }

    fn stores() -> (Arc<MemoryAdStore>, Arc<MemoryClickStore>) {
        (Arc::new(MemoryAdStore::new()), Arc::new(MemoryClickStore::new()))
    }

    async fn save_ad(
        ads: &Arc<MemoryAdStore>,
        click_url: &str,
        campaign_id: Option<EntityId>,
        ab_group: Option<AbGroup>,
    ) -> Advertisement {
        ads.save(Advertisement {
            id: 0,
            name: "Cool Hats".to_string(),
            path: "2.jpg".to_string(),
            click_url: click_url.to_string(),
            campaign_id,
            ab_group,
            click_count: 0,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_ad_is_not_found_and_appends_nothing() {
        let (ads, clicks) = stores();
        let recorder = ClickRecorder::new(ads, clicks.clone());

        let err = recorder.record(42, "session").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(clicks.count_by_ad_id(42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_click_appends_exactly_one_event() {
        let (ads, clicks) = stores();
        let ad = save_ad(&ads, "/cool-hats", Some(7), None).await;
        let recorder = ClickRecorder::new(ads, clicks.clone());

        let outcome = recorder.record(ad.id, "session-abc").await.unwrap();
        assert_eq!(outcome.redirect_to, "/cool-hats");
        assert_eq!(clicks.count_by_ad_id(ad.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_campaign_snapshot_is_taken_at_call_time() {
        let (ads, clicks) = stores();
        let ad = save_ad(&ads, "/cool-hats", Some(7), None).await;
        let recorder = ClickRecorder::new(ads.clone(), clicks.clone());

        recorder.record(ad.id, "session-abc").await.unwrap();

        // Reassign the campaign after the click; the recorded event keeps
        // the association it saw at call time.
        let mut updated = ads.find_by_id(ad.id).await.unwrap().unwrap();
        updated.campaign_id = Some(99);
        ads.save(updated).await.unwrap();

        let events = clicks.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].campaign_id, Some(7));
    }

    #[tokio::test]
    async fn test_empty_session_prefers_persisted_group() {
        let (ads, clicks) = stores();
        let ad = save_ad(&ads, "/cool-hats", None, Some(AbGroup::Variant)).await;
        let recorder = ClickRecorder::new(ads, clicks);

        let outcome = recorder.record(ad.id, "").await.unwrap();
        assert_eq!(outcome.ab_group, AbGroup::Variant);
    }

    #[tokio::test]
    async fn test_empty_session_without_persisted_group_is_control() {
        let (ads, clicks) = stores();
        let ad = save_ad(&ads, "/cool-hats", None, None).await;
        let recorder = ClickRecorder::new(ads, clicks);

        let outcome = recorder.record(ad.id, "").await.unwrap();
        assert_eq!(outcome.ab_group, AbGroup::Control);
    }

    #[tokio::test]
    async fn test_session_overrides_persisted_group() {
        let (ads, clicks) = stores();
        let ad = save_ad(&ads, "/cool-hats", None, Some(AbGroup::Variant)).await;
        let recorder = ClickRecorder::new(ads, clicks);

        let outcome = recorder.record(ad.id, "b").await.unwrap();
        // "b" hashes to bucket 0 → control, beating the persisted variant.
        assert_eq!(outcome.ab_group, AbGroup::Control);
    }

    #[tokio::test]
    async fn test_missing_click_url_falls_back_to_landing() {
        let (ads, clicks) = stores();
        let ad = save_ad(&ads, "", None, None).await;
        let recorder = ClickRecorder::new(ads, clicks);

        let outcome = recorder.record(ad.id, "session").await.unwrap();
        assert_eq!(outcome.redirect_to, "/");
    }

    #[tokio::test]
    async fn test_failed_append_propagates_store_error() {
        let ads = Arc::new(MemoryAdStore::new());
        let ad = save_ad(&ads, "/cool-hats", None, None).await;
        let recorder = ClickRecorder::new(ads, Arc::new(BrokenAppendStore));

        let err = recorder.record(ad.id, "session").await.unwrap_err();
        assert!(matches!(err, AdsError::Store(_)));
        assert!(!err.is_not_found());
    }
}
