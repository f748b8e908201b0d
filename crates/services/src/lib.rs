//! # services
//!
//! Identity/session and feedback-aggregate operations over the storage and
//! auth ports. Handlers stay thin; every rule about the entity graph lives
//! here.

use domains::{DomainError, DomainResult, Snapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod feedback;
pub mod identity;
pub mod query;

pub use feedback::FeedbackService;
pub use identity::IdentityService;
pub use query::StatusCounts;

/// Collection names, matching the original data files on disk.
pub const USERS: &str = "users";
pub const FEEDBACKS: &str = "feedbacks";
pub const CATEGORIES: &str = "categories";

/// Decodes a raw snapshot into typed records. A record that no longer
/// matches the model is a storage-level fault, not a caller error.
pub(crate) fn decode<T: DeserializeOwned>(snapshot: Snapshot) -> DomainResult<Vec<T>> {
    snapshot
        .into_iter()
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|err| DomainError::Storage(format!("undecodable record: {err}")))
        })
        .collect()
}

pub(crate) fn encode<T: Serialize>(items: Vec<T>) -> DomainResult<Snapshot> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(|err| DomainError::Storage(err.to_string())))
        .collect()
}
