//! # Handlers
//!
//! One explicit request schema per operation, validated before any domain
//! logic runs. Handlers stay thin: parse, authorize where required, call the
//! service, shape the response. Error bodies are always `{"error": "..."}`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use domains::{CollectionStore, DomainError, FeedbackItem, User};
use services::{FeedbackService, IdentityService, StatusCounts, CATEGORIES};

/// State shared across all handlers.
pub struct AppState {
    pub identity: IdentityService,
    pub feedback: FeedbackService,
    pub store: Arc<dyn CollectionStore>,
}

/// Domain error carried to the HTTP boundary.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Validation(_)
            | DomainError::InvalidCredentials(_)
            | DomainError::DuplicateAccount(_)
            | DomainError::Malformed(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Unparseable JSON surfaces the original wire message instead of axum's
/// rejection text.
fn parse_body<T: DeserializeOwned>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(inner)| inner)
        .map_err(|_| DomainError::Malformed("Failed to parse request body".into()).into())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn authorize_bearer(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| DomainError::Unauthorized("Unauthorized".into()))?;
    state
        .identity
        .authorize(token)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("Unauthorized".into()).into())
}

// ── Identity ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    state
        .identity
        .register(
            req.username.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    let token = state
        .identity
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({ "message": "Login successful", "token": token })).into_response())
}

// ── Feedback ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateFeedbackRequest {
    title: Option<String>,
    category: Option<String>,
    detail: Option<String>,
}

pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    let title = req.title.unwrap_or_default();
    let category = req.category.unwrap_or_default();
    let detail = req.detail.unwrap_or_default();
    // Field validation answers before the capability check, as the source did.
    if title.is_empty() || category.is_empty() || detail.is_empty() {
        return Err(DomainError::Validation("All fields are required".into()).into());
    }

    let user = authorize_bearer(&state, &headers).await?;
    let item = state
        .feedback
        .create(&user.email, &title, &category, &detail)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback added successfully", "feedback": item })),
    )
        .into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpvoteRequest {
    id: Option<String>,
    user_id: Option<String>,
}

pub async fn upvote_feedback(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpvoteRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    let (item, just_upvoted) = state
        .feedback
        .upvote_toggle(
            req.id.as_deref().unwrap_or_default(),
            req.user_id.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({
        "message": "Feedback upvote toggled",
        "feedback": item,
        "justUpvoted": just_upvoted,
    }))
    .into_response())
}

/// The body may also carry `username`/`email`; they are ignored — comments
/// denormalize from the stored user record, not from the client.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    id: Option<String>,
    user_id: Option<String>,
    text: Option<String>,
}

pub async fn comment_feedback(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    let item = state
        .feedback
        .add_comment(
            req.id.as_deref().unwrap_or_default(),
            req.user_id.as_deref().unwrap_or_default(),
            req.text.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment added successfully", "feedback": item })),
    )
        .into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    feedback_id: Option<String>,
    comment_id: Option<String>,
    user_id: Option<String>,
    text: Option<String>,
}

pub async fn reply_feedback(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReplyRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    let item = state
        .feedback
        .add_reply(
            req.feedback_id.as_deref().unwrap_or_default(),
            req.comment_id.as_deref().unwrap_or_default(),
            req.user_id.as_deref().unwrap_or_default(),
            req.text.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reply added successfully", "feedback": item })),
    )
        .into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    id: Option<String>,
    status: Option<String>,
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SetStatusRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let req = parse_body(body)?;
    let item = state
        .feedback
        .set_status(
            req.id.as_deref().unwrap_or_default(),
            req.status.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({ "message": "Status updated successfully", "feedback": item })).into_response())
}

pub async fn update_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Response> {
    let patch = parse_body(body)?;
    let item = state.feedback.update(&id, patch).await?;
    Ok(Json(json!({ "message": "Feedback updated successfully", "feedback": item })).into_response())
}

#[derive(Deserialize)]
pub struct ListParams {
    category: Option<String>,
    sort: Option<String>,
}

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<FeedbackItem>>> {
    let items = state
        .feedback
        .list(params.category.as_deref(), params.sort.as_deref())
        .await?;
    Ok(Json(items))
}

pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FeedbackItem>> {
    Ok(Json(state.feedback.get(&id).await?))
}

pub async fn status_counts(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusCounts>> {
    Ok(Json(state.feedback.status_counts().await?))
}

// ── Reference data ──────────────────────────────────────────────────────────

/// Static reference data, returned exactly as stored.
pub async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.store.read(CATEGORIES).await?))
}

pub async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn error_status_mapping() {
        fn status_of(err: DomainError) -> StatusCode {
            ApiError(err).into_response().status()
        }

        assert_eq!(status_of(DomainError::NotFound("Feedback".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::Unauthorized("Unauthorized".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::Validation("v".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(DomainError::DuplicateAccount("d".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(DomainError::Storage("s".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
