//! Store abstractions for the ad-serving engine, plus in-memory backends.
//!
//! The serving layer only ever talks to the traits in [`traits`]; the
//! in-memory implementations exist so the service runs self-contained and
//! the tests need no external database.

pub mod memory;
pub mod seed;
pub mod traits;

pub use memory::{MemoryAdStore, MemoryCampaignStore, MemoryClickStore};
pub use traits::{AdvertisementStore, CampaignStore, ClickEventStore};
