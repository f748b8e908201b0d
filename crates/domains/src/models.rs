//! # Domain Models
//!
//! These structs represent the core entities of the feedback board. They
//! serialize with camelCase field names, which is also the on-disk document
//! format of the JSON store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. `token` holds the single active session token; a
/// new login overwrites it, invalidating the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Unique across the collection. Registration deduplicates by exact
    /// match; login matches case-insensitively.
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Lifecycle stage of a feedback item. Any transition is allowed, including
/// backwards; `set_status` enforces no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackStatus {
    Planned,
    InProgress,
    Live,
}

impl std::str::FromStr for FeedbackStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Planned" => Ok(Self::Planned),
            "InProgress" => Ok(Self::InProgress),
            "Live" => Ok(Self::Live),
            _ => Err(()),
        }
    }
}

/// A single feedback item with its embedded comment tree and vote ledger.
///
/// Invariant: `upvotes == upvoted_by.len()` at all times. `upvoted_by` is a
/// set maintained by the toggle operation; the stored form is an array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    /// Monotonic per-collection id, 1-based, formatted as a decimal string.
    pub id: String,
    /// Email of the submitting user.
    pub author: String,
    pub title: String,
    pub category: String,
    pub detail: String,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub upvoted_by: Vec<String>,
    pub status: FeedbackStatus,
    /// Absent in older records; treated as empty.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl FeedbackItem {
    /// A freshly submitted item: Planned, no votes, no comments.
    pub fn new(author: String, title: String, category: String, detail: String, id: String) -> Self {
        Self {
            id,
            author,
            title,
            category,
            detail,
            upvotes: 0,
            upvoted_by: Vec::new(),
            status: FeedbackStatus::Planned,
            comments: Vec::new(),
        }
    }
}

/// A comment on a feedback item. Immutable once created except for the
/// append-only `replies` sequence. The username/email pair is a denormalized
/// snapshot of the author at creation time, not a live reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Time-derived id (current millis as a decimal string).
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// Append-only leaf of the comment tree; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
