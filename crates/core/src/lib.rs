pub mod config;
pub mod eligibility;
pub mod error;
pub mod experiment;
pub mod types;

pub use config::AppConfig;
pub use error::{AdsError, AdsResult};
pub use types::{AbGroup, AdClick, Advertisement, Campaign, ServedAd};
