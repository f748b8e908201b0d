//! Feedback aggregate operations over HTTP: creation, merge-patch update,
//! vote toggling, comments/replies, and status changes.

use axum::http::{Method, StatusCode};
use integration_tests::{test_app, TestApp};
use serde_json::json;

async fn create_item(app: &TestApp, token: &str) -> serde_json::Value {
    let (status, body) = app
        .request(
            Method::POST,
            "/feedback",
            Some(token),
            Some(json!({ "title": "Dark mode", "category": "UI", "detail": "Please add it" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["feedback"].clone()
}

#[tokio::test]
async fn submission_requires_a_valid_bearer_token() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/feedback",
            json!({ "title": "t", "category": "UI", "detail": "d" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = app
        .request(
            Method::POST,
            "/feedback",
            Some("deadbeefdeadbeefdeadbeefdeadbeef"),
            Some(json!({ "title": "t", "category": "UI", "detail": "d" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_item_has_the_documented_defaults() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;

    let item = create_item(&app, &token).await;
    assert_eq!(item["id"], "1");
    assert_eq!(item["author"], "a@x.com");
    assert_eq!(item["status"], "Planned");
    assert_eq!(item["upvotes"], 0);
    assert_eq!(item["comments"], json!([]));
    assert_eq!(item["upvotedBy"], json!([]));
}

#[tokio::test]
async fn missing_fields_answer_400_even_without_a_token() {
    // Field validation runs before the capability check, as the source did.
    let app = test_app();

    let (status, body) = app
        .post("/feedback", json!({ "title": "t", "category": "UI" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn upvote_toggle_round_trips() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    create_item(&app, &token).await;

    let (status, body) = app
        .post("/feedback/upvote", json!({ "id": "1", "userId": "u-1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["justUpvoted"], true);
    assert_eq!(body["feedback"]["upvotes"], 1);
    assert_eq!(body["feedback"]["upvotedBy"], json!(["u-1"]));

    let (_, body) = app
        .post("/feedback/upvote", json!({ "id": "1", "userId": "u-1" }))
        .await;
    assert_eq!(body["justUpvoted"], false);
    assert_eq!(body["feedback"]["upvotes"], 0);
    assert_eq!(body["feedback"]["upvotedBy"], json!([]));
}

#[tokio::test]
async fn upvote_validates_its_fields_and_target() {
    let app = test_app();

    let (status, _) = app.post("/feedback/upvote", json!({ "id": "1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/feedback/upvote", json!({ "id": "9", "userId": "u-1" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Feedback not found");
}

#[tokio::test]
async fn comment_then_reply_nests_with_a_denormalized_author() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    let user_id = app.user_id(&token).await;
    create_item(&app, &token).await;

    let (status, body) = app
        .post(
            "/feedback/comment",
            json!({ "id": "1", "userId": user_id, "text": "Great idea" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment = &body["feedback"]["comments"][0];
    assert_eq!(comment["username"], "alice");
    assert_eq!(comment["email"], "a@x.com");
    assert_eq!(comment["replies"], json!([]));
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/feedback/reply",
            json!({
                "feedbackId": "1",
                "commentId": comment_id,
                "userId": user_id,
                "text": "Agreed",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let replies = &body["feedback"]["comments"][0]["replies"];
    assert_eq!(replies.as_array().unwrap().len(), 1);
    assert_eq!(replies[0]["text"], "Agreed");
}

#[tokio::test]
async fn comment_and_reply_reject_missing_references() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    let user_id = app.user_id(&token).await;
    create_item(&app, &token).await;

    let (status, body) = app
        .post(
            "/feedback/comment",
            json!({ "id": "9", "userId": user_id, "text": "hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Feedback not found");

    let (status, body) = app
        .post(
            "/feedback/comment",
            json!({ "id": "1", "userId": "ghost", "text": "hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, body) = app
        .post(
            "/feedback/reply",
            json!({ "feedbackId": "1", "commentId": "nope", "userId": user_id, "text": "hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Comment not found");
}

#[tokio::test]
async fn update_merges_the_patch_wholesale() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    create_item(&app, &token).await;

    let (status, body) = app
        .put(
            "/feedback/1",
            json!({
                "title": "Dark mode v2",
                "category": "UI",
                "detail": "With a toggle",
                "upvotes": 40,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback updated successfully");
    assert_eq!(body["feedback"]["title"], "Dark mode v2");
    // The merge is unrestricted; the vote count was overwritten.
    assert_eq!(body["feedback"]["upvotes"], 40);
}

#[tokio::test]
async fn update_validates_fields_and_target() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    create_item(&app, &token).await;

    let (status, body) = app.put("/feedback/1", json!({ "title": "only" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, _) = app
        .put(
            "/feedback/9",
            json!({ "title": "t", "category": "c", "detail": "d" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_can_move_in_any_direction() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    create_item(&app, &token).await;

    let (status, body) = app
        .put("/feedback/status", json!({ "id": "1", "status": "Live" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"]["status"], "Live");

    // Backwards transition is permitted.
    let (_, body) = app
        .put("/feedback/status", json!({ "id": "1", "status": "Planned" }))
        .await;
    assert_eq!(body["feedback"]["status"], "Planned");

    let (status, body) = app
        .put("/feedback/status", json!({ "id": "1", "status": "Shipped" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status value");
}

#[tokio::test]
async fn single_item_fetch() {
    let app = test_app();
    let token = app.signup("alice", "a@x.com", "pw").await;
    create_item(&app, &token).await;

    let (status, body) = app.get("/feedback/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dark mode");

    let (status, body) = app.get("/feedback/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Feedback not found");
}
