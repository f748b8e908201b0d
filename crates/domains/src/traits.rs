//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the services.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DomainResult;

/// A full in-memory snapshot of one named collection.
pub type Snapshot = Vec<Value>;

/// A serialized read-modify-write step: receives the loaded snapshot and
/// returns the replacement document.
pub type ApplyFn = Box<dyn FnOnce(Snapshot) -> DomainResult<Snapshot> + Send>;

/// Whole-document persistence contract for the named collections
/// (`users`, `feedbacks`, `categories`).
///
/// Mutations must go through [`apply`](CollectionStore::apply): the adapter
/// holds the collection's writer lock across load → op → persist, so every
/// mutation observes the result of the previous one. That single-writer
/// discipline is what makes sequential id assignment safe.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Loads the full snapshot. A missing collection yields an empty
    /// document; an unreadable one degrades to empty rather than failing
    /// the request.
    async fn read(&self, collection: &str) -> DomainResult<Snapshot>;

    /// Runs `op` under the collection's writer lock and persists the
    /// returned document as an atomic whole-document replace. An `Err`
    /// from `op` aborts without writing and is returned to the caller.
    async fn apply(&self, collection: &str, op: ApplyFn) -> DomainResult<Snapshot>;
}

/// Credential hashing contract: a slow, salted one-way function.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> DomainResult<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Issues opaque bearer tokens (128 bits of entropy, hex-encoded).
pub trait TokenSource: Send + Sync {
    fn issue(&self) -> String;
}
