//! # Feedback Aggregate
//!
//! All mutations of the feedback collection: submission, merge-patch update,
//! vote toggling, comment/reply growth, and status changes. Every mutation
//! runs inside the store's serialized `apply`, so the `count+1` id scheme and
//! the `upvotes == |upvotedBy|` invariant hold under concurrency.

use std::sync::Arc;

use chrono::Utc;
use domains::{CollectionStore, Comment, DomainError, DomainResult, FeedbackItem, Reply, Snapshot, User};
use serde_json::{Map, Value};

use crate::query::{self, StatusCounts};
use crate::{decode, encode, FEEDBACKS, USERS};

pub struct FeedbackService {
    store: Arc<dyn CollectionStore>,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }

    /// Submits a new item: id = count+1 as a decimal string, status Planned,
    /// no votes, no comments. The author email comes from the authorized
    /// session, never from the body.
    pub async fn create(
        &self,
        author: &str,
        title: &str,
        category: &str,
        detail: &str,
    ) -> DomainResult<FeedbackItem> {
        if title.is_empty() || category.is_empty() || detail.is_empty() {
            return Err(DomainError::Validation("All fields are required".into()));
        }

        let author = author.to_string();
        let title = title.to_string();
        let category = category.to_string();
        let detail = detail.to_string();

        let next = self
            .store
            .apply(
                FEEDBACKS,
                Box::new(move |snapshot| {
                    let mut items: Vec<FeedbackItem> = decode(snapshot)?;
                    let id = (items.len() + 1).to_string();
                    items.push(FeedbackItem::new(author, title, category, detail, id));
                    encode(items)
                }),
            )
            .await?;

        let mut items: Vec<FeedbackItem> = decode(next)?;
        items
            .pop()
            .ok_or_else(|| DomainError::Storage("created item missing from snapshot".into()))
    }

    /// Unrestricted shallow merge of the patch over the stored record: any
    /// key in the patch overwrites the stored one, `upvotes` and `status`
    /// included. The three required fields must be present and non-empty,
    /// and the merged document must still decode as a feedback item.
    pub async fn update(&self, id: &str, patch: Map<String, Value>) -> DomainResult<FeedbackItem> {
        for key in ["title", "category", "detail"] {
            match patch.get(key) {
                Some(Value::String(s)) if !s.is_empty() => {}
                _ => return Err(DomainError::Validation("All fields are required".into())),
            }
        }

        // The patch may even rewrite the id; the merged record is looked up
        // by whichever id it ends up with.
        let merged_id = patch
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string();
        let target = id.to_string();

        let next = self
            .store
            .apply(
                FEEDBACKS,
                Box::new(move |mut snapshot| {
                    let slot = snapshot
                        .iter_mut()
                        .find(|v| v.get("id").and_then(Value::as_str) == Some(target.as_str()))
                        .ok_or_else(|| DomainError::NotFound("Feedback".into()))?;
                    let record = slot
                        .as_object_mut()
                        .ok_or_else(|| DomainError::Storage("feedback record is not an object".into()))?;
                    for (key, value) in patch {
                        record.insert(key, value);
                    }
                    serde_json::from_value::<FeedbackItem>(slot.clone())
                        .map_err(|_| DomainError::Validation("Invalid field value".into()))?;
                    Ok(snapshot)
                }),
            )
            .await?;

        find_item(next, &merged_id)
    }

    /// Toggle, not a monotonic increment: a second call by the same user
    /// undoes the first. Returns the updated item and whether this call
    /// added the vote.
    pub async fn upvote_toggle(&self, id: &str, user_id: &str) -> DomainResult<(FeedbackItem, bool)> {
        if id.is_empty() || user_id.is_empty() {
            return Err(DomainError::Validation("Feedback ID and user ID are required".into()));
        }

        let target = id.to_string();
        let voter = user_id.to_string();

        let next = self
            .store
            .apply(
                FEEDBACKS,
                Box::new(move |snapshot| {
                    let mut items: Vec<FeedbackItem> = decode(snapshot)?;
                    let item = items
                        .iter_mut()
                        .find(|f| f.id == target)
                        .ok_or_else(|| DomainError::NotFound("Feedback".into()))?;
                    match item.upvoted_by.iter().position(|u| u == &voter) {
                        Some(pos) => {
                            item.upvoted_by.remove(pos);
                            item.upvotes = item.upvotes.saturating_sub(1);
                        }
                        None => {
                            item.upvoted_by.push(voter);
                            item.upvotes += 1;
                        }
                    }
                    encode(items)
                }),
            )
            .await?;

        let item = find_item(next, id)?;
        let just_upvoted = item.upvoted_by.iter().any(|u| u == user_id);
        Ok((item, just_upvoted))
    }

    /// Appends a comment carrying a denormalized snapshot of the author's
    /// current username/email; later profile edits do not rewrite it.
    pub async fn add_comment(
        &self,
        feedback_id: &str,
        user_id: &str,
        text: &str,
    ) -> DomainResult<FeedbackItem> {
        if feedback_id.is_empty() || user_id.is_empty() || text.is_empty() {
            return Err(DomainError::Validation("All fields are required".into()));
        }

        let user = self.resolve_user(user_id).await?;
        let target = feedback_id.to_string();
        let text = text.to_string();

        let next = self
            .store
            .apply(
                FEEDBACKS,
                Box::new(move |snapshot| {
                    let mut items: Vec<FeedbackItem> = decode(snapshot)?;
                    let item = items
                        .iter_mut()
                        .find(|f| f.id == target)
                        .ok_or_else(|| DomainError::NotFound("Feedback".into()))?;
                    let now = Utc::now();
                    item.comments.push(Comment {
                        id: now.timestamp_millis().to_string(),
                        user_id: user.id.to_string(),
                        username: user.username,
                        email: user.email,
                        text,
                        created_at: now,
                        replies: Vec::new(),
                    });
                    encode(items)
                }),
            )
            .await?;

        find_item(next, feedback_id)
    }

    /// Appends a reply to one comment's append-only reply sequence.
    pub async fn add_reply(
        &self,
        feedback_id: &str,
        comment_id: &str,
        user_id: &str,
        text: &str,
    ) -> DomainResult<FeedbackItem> {
        let user = self.resolve_user(user_id).await?;
        let target = feedback_id.to_string();
        let comment_id_owned = comment_id.to_string();
        let text = text.to_string();

        let next = self
            .store
            .apply(
                FEEDBACKS,
                Box::new(move |snapshot| {
                    let mut items: Vec<FeedbackItem> = decode(snapshot)?;
                    let item = items
                        .iter_mut()
                        .find(|f| f.id == target)
                        .ok_or_else(|| DomainError::NotFound("Feedback".into()))?;
                    let comment = item
                        .comments
                        .iter_mut()
                        .find(|c| c.id == comment_id_owned)
                        .ok_or_else(|| DomainError::NotFound("Comment".into()))?;
                    let now = Utc::now();
                    comment.replies.push(Reply {
                        id: now.timestamp_millis().to_string(),
                        user_id: user.id.to_string(),
                        username: user.username,
                        email: user.email,
                        text,
                        created_at: now,
                    });
                    encode(items)
                }),
            )
            .await?;

        find_item(next, feedback_id)
    }

    /// Overwrites the lifecycle status. Any transition is allowed, backwards
    /// included; only the enum value itself is validated.
    pub async fn set_status(&self, id: &str, status: &str) -> DomainResult<FeedbackItem> {
        let status: domains::FeedbackStatus = status
            .parse()
            .map_err(|_| DomainError::Validation("Invalid status value".into()))?;
        let target = id.to_string();

        let next = self
            .store
            .apply(
                FEEDBACKS,
                Box::new(move |snapshot| {
                    let mut items: Vec<FeedbackItem> = decode(snapshot)?;
                    let item = items
                        .iter_mut()
                        .find(|f| f.id == target)
                        .ok_or_else(|| DomainError::NotFound("Feedback".into()))?;
                    item.status = status;
                    encode(items)
                }),
            )
            .await?;

        find_item(next, id)
    }

    pub async fn get(&self, id: &str) -> DomainResult<FeedbackItem> {
        find_item(self.store.read(FEEDBACKS).await?, id)
    }

    /// Full-collection listing with optional category filter and sort mode.
    pub async fn list(
        &self,
        category: Option<&str>,
        sort: Option<&str>,
    ) -> DomainResult<Vec<FeedbackItem>> {
        let items: Vec<FeedbackItem> = decode(self.store.read(FEEDBACKS).await?)?;
        let mut items = query::filter_by_category(items, category);
        query::sort_items(&mut items, sort);
        Ok(items)
    }

    pub async fn status_counts(&self) -> DomainResult<StatusCounts> {
        let items: Vec<FeedbackItem> = decode(self.store.read(FEEDBACKS).await?)?;
        Ok(query::status_counts(&items))
    }

    async fn resolve_user(&self, user_id: &str) -> DomainResult<User> {
        let users: Vec<User> = decode(self.store.read(USERS).await?)?;
        users
            .into_iter()
            .find(|u| u.id.to_string() == user_id)
            .ok_or_else(|| DomainError::NotFound("User".into()))
    }
}

fn find_item(snapshot: Snapshot, id: &str) -> DomainResult<FeedbackItem> {
    decode::<FeedbackItem>(snapshot)?
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| DomainError::NotFound("Feedback".into()))
}
