//! Query/projection helpers: pure functions over a loaded snapshot.

use domains::{FeedbackItem, FeedbackStatus};
use serde::Serialize;

/// Drops items outside `category`. `None` and the `"all"` sentinel keep
/// everything; matching is exact.
pub fn filter_by_category(items: Vec<FeedbackItem>, category: Option<&str>) -> Vec<FeedbackItem> {
    match category {
        Some(category) if category != "all" => items
            .into_iter()
            .filter(|item| item.category == category)
            .collect(),
        _ => items,
    }
}

/// Reorders in place. Unknown modes fall back to `most-upvotes`; `"all"`
/// keeps insertion order. `sort_by` is stable, so equal keys keep their
/// original relative order.
pub fn sort_items(items: &mut [FeedbackItem], sort: Option<&str>) {
    match sort.unwrap_or("most-upvotes") {
        "all" => {}
        "least-upvotes" => items.sort_by(|a, b| a.upvotes.cmp(&b.upvotes)),
        "most-comments" => items.sort_by(|a, b| b.comments.len().cmp(&a.comments.len())),
        "least-comments" => items.sort_by(|a, b| a.comments.len().cmp(&b.comments.len())),
        _ => items.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
    }
}

/// Per-status tally. All three keys are always present, zero or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusCounts {
    pub planned: usize,
    pub in_progress: usize,
    pub live: usize,
}

pub fn status_counts(items: &[FeedbackItem]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for item in items {
        match item.status {
            FeedbackStatus::Planned => counts.planned += 1,
            FeedbackStatus::InProgress => counts.in_progress += 1,
            FeedbackStatus::Live => counts.live += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str, upvotes: u64) -> FeedbackItem {
        let mut item = FeedbackItem::new(
            "a@x.com".into(),
            format!("Item {id}"),
            category.into(),
            "detail".into(),
            id.into(),
        );
        item.upvotes = upvotes;
        item.upvoted_by = (0..upvotes).map(|n| format!("u-{n}")).collect();
        item
    }

    #[test]
    fn category_filter_honors_the_all_sentinel() {
        let items = vec![item("1", "UI", 0), item("2", "UX", 0)];
        assert_eq!(filter_by_category(items.clone(), None).len(), 2);
        assert_eq!(filter_by_category(items.clone(), Some("all")).len(), 2);
        let ui = filter_by_category(items, Some("UI"));
        assert_eq!(ui.len(), 1);
        assert_eq!(ui[0].id, "1");
    }

    #[test]
    fn sort_modes() {
        let mut items = vec![item("1", "UI", 1), item("2", "UI", 3), item("3", "UI", 2)];

        sort_items(&mut items, None);
        assert_eq!(ids(&items), ["2", "3", "1"]);

        sort_items(&mut items, Some("least-upvotes"));
        assert_eq!(ids(&items), ["1", "3", "2"]);

        sort_items(&mut items, Some("bogus"));
        assert_eq!(ids(&items), ["2", "3", "1"]);
    }

    #[test]
    fn all_keeps_insertion_order() {
        let mut items = vec![item("1", "UI", 1), item("2", "UI", 3)];
        sort_items(&mut items, Some("all"));
        assert_eq!(ids(&items), ["1", "2"]);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let mut items = vec![item("1", "UI", 2), item("2", "UI", 2), item("3", "UI", 5)];
        sort_items(&mut items, Some("most-upvotes"));
        assert_eq!(ids(&items), ["3", "1", "2"]);
    }

    #[test]
    fn counts_always_sum_to_total() {
        let mut a = item("1", "UI", 0);
        a.status = FeedbackStatus::Live;
        let items = vec![a, item("2", "UI", 0), item("3", "UX", 0)];

        let counts = status_counts(&items);
        assert_eq!(counts.planned + counts.in_progress + counts.live, items.len());
        assert_eq!(counts.live, 1);
    }

    fn ids(items: &[FeedbackItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }
}
