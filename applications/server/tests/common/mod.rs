//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use top100_catalog::{CatalogClient, CatalogConfig, ProviderTokens};
use top100_core::{StorageContext, UpsertUser, UserId};
use top100_server::{create_router, state::AppState, SessionService};
use top100_storage::LocalStorageContext;
use tower::util::ServiceExt;
use wiremock::MockServer;

pub const SESSION_SECRET: &str = "test-secret-key";

/// Router over a real SQLite file and a mock catalog
pub struct TestApp {
    pub router: Router,
    pub db: Arc<LocalStorageContext>,
    pub sessions: Arc<SessionService>,
    pub catalog: MockServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let pool = top100_storage::open(&db_url)
            .await
            .expect("Failed to open test database");
        let db = Arc::new(LocalStorageContext::new(pool));

        let catalog = MockServer::start().await;
        Self::with_storage(db.clone(), db, catalog, temp_dir)
    }

    /// Same app, but handlers see `storage` instead of the real database
    pub fn with_storage(
        storage: Arc<dyn StorageContext>,
        db: Arc<LocalStorageContext>,
        catalog: MockServer,
        temp_dir: TempDir,
    ) -> Self {
        let catalog_client = CatalogClient::new(
            CatalogConfig::new(
                "client-id",
                "client-secret",
                "http://localhost:8080/api/auth/callback",
            )
            .with_base_url(catalog.uri()),
        )
        .expect("Failed to create catalog client");

        let sessions = Arc::new(SessionService::new(SESSION_SECRET.to_string(), 1));
        let router = create_router(AppState::new(
            storage,
            Arc::clone(&sessions),
            Arc::new(catalog_client),
        ));

        Self {
            router,
            db,
            sessions,
            catalog,
            temp_dir,
        }
    }

    /// Session token for `user_id` without going through the provider
    pub fn token_for(&self, user_id: &str) -> String {
        self.sessions
            .issue(
                &UserId::new(user_id),
                &ProviderTokens {
                    access_token: format!("provider-{}", user_id),
                    refresh_token: Some(format!("refresh-{}", user_id)),
                    expires_at: 0,
                },
            )
            .expect("Failed to issue session")
            .token
    }

    /// Store the user and return a session token for them
    pub async fn sign_in(&self, user_id: &str) -> String {
        self.db
            .upsert_user(UpsertUser {
                id: UserId::new(user_id),
                display_name: Some(format!("User {}", user_id)),
                profile_image: Some(format!("https://img.example/{}.jpg", user_id)),
            })
            .await
            .expect("Failed to create test user");
        self.token_for(user_id)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed")
    }

    /// Send a JSON request and decode the JSON response
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Save a playlist of the given catalog ids through the API
    pub async fn save(&self, token: &str, catalog_ids: &[&str]) -> (StatusCode, Value) {
        let tracks: Vec<Value> = catalog_ids.iter().map(|id| track_json(id)).collect();
        self.json(
            Method::PUT,
            "/api/me/playlist",
            Some(token),
            Some(json!({ "title": "Best Ever", "tracks": tracks })),
        )
        .await
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }
}

/// Editor entry as the client submits it
pub fn track_json(catalog_id: &str) -> Value {
    json!({
        "id": catalog_id,
        "name": format!("Song {}", catalog_id),
        "artist": "Artist",
        "album": "Album",
        "albumArt": format!("https://img.example/{}.jpg", catalog_id),
        "previewUrl": null,
        "uri": format!("spotify:track:{}", catalog_id)
    })
}

/// Catalog ids of a playlist response, in order
pub fn catalog_ids(playlist: &Value) -> Vec<String> {
    playlist["tracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|entry| entry["track"]["catalogId"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
