//! Shared fixture for the HTTP integration tests: the real router over the
//! real JSON store in a temp directory, driven in-process through tower.

use std::path::Path;
use std::sync::Arc;

use api_adapters::{build_router, AppState};
use auth_adapters::{Argon2Hasher, HexTokenSource};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use domains::CollectionStore;
use services::{FeedbackService, IdentityService};
use storage_adapters::JsonFileStore;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    data_dir: tempfile::TempDir,
}

pub fn test_app() -> TestApp {
    let data_dir = tempfile::tempdir().expect("failed to create temp data dir");
    let store: Arc<dyn CollectionStore> = Arc::new(JsonFileStore::new(data_dir.path()));
    let identity = IdentityService::new(
        store.clone(),
        Arc::new(Argon2Hasher),
        Arc::new(HexTokenSource),
    );
    let feedback = FeedbackService::new(store.clone());
    let state = Arc::new(AppState { identity, feedback, store });
    TestApp {
        router: build_router(state.clone()),
        state,
        data_dir,
    }
}

impl TestApp {
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Sends one request and returns (status, parsed JSON body). An empty
    /// body parses as JSON null.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request(Method::PUT, path, None, Some(body)).await
    }

    /// Registers and logs in, returning the session token.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> String {
        let (status, _) = self
            .post(
                "/register",
                serde_json::json!({ "username": username, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post("/login", serde_json::json!({ "email": email, "password": password }))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("login returned no token").to_string()
    }

    /// Resolves a session token to the stored user id, the way a client
    /// would know its own id.
    pub async fn user_id(&self, token: &str) -> String {
        self.state
            .identity
            .authorize(token)
            .await
            .expect("store unavailable")
            .expect("token did not authorize")
            .id
            .to_string()
    }
}
