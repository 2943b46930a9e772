use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for advertisements and campaigns, assigned by the store.
pub type EntityId = u64;

/// A/B experiment group. Two fixed labels, serialized lowercase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AbGroup {
    Control,
    Variant,
}

impl AbGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbGroup::Control => "control",
            AbGroup::Variant => "variant",
        }
    }
}

impl std::fmt::Display for AbGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single advertisement record.
///
/// `ab_group` is a persisted group assignment that may be set
/// administratively. The group *resolved* from a caller's session is never
/// stored on this struct; responses carry it on [`ServedAd`] instead, so the
/// persisted representation and the per-request value cannot alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: EntityId,
    pub name: String,
    /// Banner asset reference served by the static layer (e.g. `1.jpg`).
    pub path: String,
    /// Click-through target. May be empty; the recorder falls back to the
    /// default landing path.
    pub click_url: String,
    pub campaign_id: Option<EntityId>,
    pub ab_group: Option<AbGroup>,
    /// Aggregated total written back in bulk by the reconciliation job.
    /// Defaults to 0 and is only ever overwritten, never incremented in
    /// place.
    #[serde(default)]
    pub click_count: u64,
}

/// An ad campaign owning zero or more advertisements (back-reference only;
/// [`Advertisement`] owns the foreign key).
///
/// Both dates are inclusive. A reversed range (`start_date > end_date`) is
/// not validated and silently excludes the campaign's ads from serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: EntityId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Budget in minor currency units.
    pub budget_cents: u64,
    pub target_taxon: String,
}

impl Campaign {
    /// True when `today` falls inside the inclusive eligibility window and
    /// the campaign still has budget.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date && self.budget_cents > 0
    }
}

/// A recorded ad click. Append-only: never updated or deleted.
///
/// `campaign_id` and `ab_group` are denormalized snapshots captured at click
/// time so analytics queries need no joins. `clicked_at` is stamped exactly
/// once at construction from the ambient clock, never from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdClick {
    pub id: Uuid,
    pub ad_id: EntityId,
    pub campaign_id: Option<EntityId>,
    pub ab_group: Option<AbGroup>,
    pub clicked_at: DateTime<Utc>,
}

impl AdClick {
    pub fn new(ad_id: EntityId, campaign_id: Option<EntityId>, ab_group: Option<AbGroup>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ad_id,
            campaign_id,
            ab_group,
            clicked_at: Utc::now(),
        }
    }
}

/// Response-only pairing of a stored advertisement with the experiment group
/// resolved for the current request. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServedAd {
    #[serde(flatten)]
    pub ad: Advertisement,
    pub resolved_ab_group: AbGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ab_group_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AbGroup::Control).unwrap(),
            "\"control\""
        );
        assert_eq!(
            serde_json::to_string(&AbGroup::Variant).unwrap(),
            "\"variant\""
        );
    }

    #[test]
    fn test_campaign_active_window_is_inclusive() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let campaign = Campaign {
            id: 1,
            name: "Summer Hats".to_string(),
            start_date: today,
            end_date: today,
            budget_cents: 50_000,
            target_taxon: "hats".to_string(),
        };
        assert!(campaign.is_active(today));
        assert!(!campaign.is_active(today.succ_opt().unwrap()));
        assert!(!campaign.is_active(today.pred_opt().unwrap()));
    }

    #[test]
    fn test_campaign_with_zero_budget_is_never_active() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let campaign = Campaign {
            id: 2,
            name: "Empty".to_string(),
            start_date: today.pred_opt().unwrap(),
            end_date: today.succ_opt().unwrap(),
            budget_cents: 0,
            target_taxon: "misc".to_string(),
        };
        assert!(!campaign.is_active(today));
    }

    #[test]
    fn test_click_stamps_time_at_construction() {
        let before = Utc::now();
        let click = AdClick::new(7, Some(3), Some(AbGroup::Variant));
        let after = Utc::now();
        assert!(click.clicked_at >= before && click.clicked_at <= after);
        assert_eq!(click.ad_id, 7);
        assert_eq!(click.campaign_id, Some(3));
    }
}
