//! Campaign eligibility filtering for ad serving.

use crate::types::{Advertisement, Campaign, EntityId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Returns the subset of `ads` eligible for serving on `today`, preserving
/// input order.
///
/// An advertisement with no campaign is always eligible. An advertisement
/// whose `campaign_id` does not resolve against `campaigns` is treated the
/// same way. One with a campaign is eligible iff `today` falls inside the
/// campaign's inclusive date window and the campaign has budget left.
///
/// The empty-result fallback (serve everything when nothing qualifies) is
/// the caller's responsibility, not this function's.
pub fn filter(
    ads: &[Advertisement],
    campaigns: &HashMap<EntityId, Campaign>,
    today: NaiveDate,
) -> Vec<Advertisement> {
    ads.iter()
        .filter(|ad| match ad.campaign_id.and_then(|id| campaigns.get(&id)) {
            Some(campaign) => campaign.is_active(today),
            None => true,
        })
        .cloned()
        .collect()
}
