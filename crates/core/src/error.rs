use thiserror::Error;

use crate::types::EntityId;

pub type AdsResult<T> = Result<T, AdsError>;

#[derive(Error, Debug)]
pub enum AdsError {
    /// The referenced advertisement does not exist. Surfaced to the caller
    /// as a client-visible miss, never retried.
    #[error("advertisement not found: {0}")]
    AdNotFound(EntityId),

    /// A store call failed. Propagated immediately from selection and click
    /// recording; the aggregator catches it internally.
    #[error("store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AdsError {
    /// True for the client-visible miss; everything else is a server fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdsError::AdNotFound(_))
    }
}
