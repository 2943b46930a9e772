//! Ad-serving decision and aggregation engine.
//!
//! - [`selection`] — which ads to serve for a request, stamped with the
//!   caller's resolved experiment group.
//! - [`click`] — append-only click recording with denormalized snapshots.
//! - [`aggregation`] — the periodic job reconciling click-count snapshots
//!   from the event log.
//! - [`stats`] — aggregate A/B statistics over the catalog.

pub mod aggregation;
pub mod click;
pub mod selection;
pub mod stats;

pub use aggregation::ClickAggregator;
pub use click::{ClickOutcome, ClickRecorder};
pub use selection::AdSelectionService;
pub use stats::{AbStats, AbStatsService};
