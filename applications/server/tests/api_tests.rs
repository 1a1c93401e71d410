/// API integration tests
/// Tests complete HTTP request/response cycles with a real database and a mock catalog
mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{body_json, catalog_ids, track_json, TestApp};
use serde_json::{json, Value};
use std::sync::Arc;
use top100_core::{
    CastVote, PlaylistId, PublicPlaylist, SavePlaylist, SavedPlaylist, StorageContext,
    Top100Error, UpsertUser, User, UserId, Vote, VoteValue, Voter,
};
use top100_storage::LocalStorageContext;
use wiremock::{
    matchers::{body_string_contains, header as header_eq, method, path, query_param},
    Mock, ResponseTemplate,
};

/// Ids needed to vote on the first track of a saved playlist
async fn first_track_of(app: &TestApp, owner: &str) -> (String, String) {
    let (status, playlist) = app
        .json(
            Method::GET,
            &format!("/api/users/{}/playlist", owner),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    (
        playlist["playlist"]["id"].as_str().unwrap().to_string(),
        playlist["tracks"][0]["track"]["id"].as_str().unwrap().to_string(),
    )
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// Search
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_catalog() {
        let app = TestApp::new().await;
        Mock::given(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.catalog)
            .await;
        let token = app.token_for("alice");

        let (status, _) = app
            .json(Method::GET, "/api/search?q=%20%20", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app.json(Method::GET, "/api/search", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Search query is required");
    }

    #[tokio::test]
    async fn test_query_is_checked_before_session() {
        let app = TestApp::new().await;

        let (status, _) = app.json(Method::GET, "/api/search?q=", None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_requires_session() {
        let app = TestApp::new().await;

        let (status, _) = app.json(Method::GET, "/api/search?q=queen", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .json(Method::GET, "/api/search?q=queen", Some("forged"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_search_forwards_provider_token() {
        let app = TestApp::new().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "under pressure"))
            .and(query_param("type", "track"))
            .and(header_eq("authorization", "Bearer provider-alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {
                    "items": [{
                        "id": "t1",
                        "name": "Under Pressure",
                        "artists": [{"name": "Queen"}, {"name": "David Bowie"}],
                        "album": {"name": "Hot Space", "images": [{"url": "https://img/640"}]},
                        "preview_url": "https://preview/t1",
                        "uri": "spotify:track:t1"
                    }]
                }
            })))
            .expect(1)
            .mount(&app.catalog)
            .await;
        let token = app.token_for("alice");

        let (status, body) = app
            .json(
                Method::GET,
                "/api/search?q=under%20pressure",
                Some(&token),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        let tracks = body["tracks"].as_array().unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0]["id"], "t1");
        assert_eq!(tracks[0]["artist"], "Queen, David Bowie");
        assert_eq!(tracks[0]["albumArt"], "https://img/640");
        assert_eq!(tracks[0]["previewUrl"], "https://preview/t1");
    }

    #[tokio::test]
    async fn test_rejected_provider_token_is_unauthorized() {
        let app = TestApp::new().await;
        Mock::given(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"status": 401, "message": "The access token expired"}
            })))
            .mount(&app.catalog)
            .await;
        let token = app.token_for("alice");

        let (status, _) = app
            .json(Method::GET, "/api/search?q=queen", Some(&token), None)
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generic_500() {
        let app = TestApp::new().await;
        Mock::given(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&app.catalog)
            .await;
        let token = app.token_for("alice");

        let (status, body) = app
            .json(Method::GET, "/api/search?q=queen", Some(&token), None)
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Catalog request failed");
    }
}

// =============================================================================
// Sign-in
// =============================================================================

mod sign_in {
    use super::*;

    fn callback_request(query: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(format!("/api/auth/callback?{}", query));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn mount_provider(app: &TestApp) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("code=auth-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "provider-access",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "provider-refresh"
            })))
            .mount(&app.catalog)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .and(header_eq("authorization", "Bearer provider-access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "alice",
                "display_name": "Alice",
                "images": [{"url": "https://img/alice"}]
            })))
            .mount(&app.catalog)
            .await;
    }

    #[tokio::test]
    async fn test_login_redirects_with_state_cookie() {
        let app = TestApp::new().await;

        let response = app
            .send(
                Request::builder()
                    .uri("/api/auth/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with(&format!("{}/authorize?", app.catalog.uri())));
        assert!(location.contains("client_id=client-id"));
        assert!(location.contains("response_type=code"));

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let state = cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("oauth_state="))
            .unwrap();
        assert!(!state.is_empty());
        assert!(location.contains(&format!("state={}", state)));
    }

    #[tokio::test]
    async fn test_callback_issues_session_and_stores_user() {
        let app = TestApp::new().await;
        mount_provider(&app).await;

        let response = app
            .send(callback_request(
                "code=auth-code&state=abc",
                Some("oauth_state=abc"),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        assert_eq!(body["userId"], "alice");
        let token = body["sessionToken"].as_str().unwrap();
        let session = app.sessions.verify(token).unwrap();
        assert_eq!(session.access_token, "provider-access");
        assert_eq!(session.refresh_token.as_deref(), Some("provider-refresh"));

        let user = app.db.get_user(&UserId::new("alice")).await.unwrap().unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert_eq!(user.profile_image.as_deref(), Some("https://img/alice"));

        // The new session is accepted by protected routes
        let (status, _) = app.save(token, &["a"]).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_callback_with_provider_error_is_unauthorized() {
        let app = TestApp::new().await;

        let response = app
            .send(callback_request("error=access_denied", Some("oauth_state=abc")))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_callback_without_code_is_bad_request() {
        let app = TestApp::new().await;

        let response = app
            .send(callback_request("state=abc", Some("oauth_state=abc")))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_callback_with_mismatched_state_skips_exchange() {
        let app = TestApp::new().await;
        Mock::given(path("/api/token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.catalog)
            .await;

        let response = app
            .send(callback_request(
                "code=auth-code&state=abc",
                Some("oauth_state=other"),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(callback_request("code=auth-code&state=abc", None))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_callback_with_rejected_code_is_unauthorized() {
        let app = TestApp::new().await;
        Mock::given(path("/api/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
            )
            .mount(&app.catalog)
            .await;

        let response = app
            .send(callback_request(
                "code=stale&state=abc",
                Some("oauth_state=abc"),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_reissues_session_with_new_provider_token() {
        let app = TestApp::new().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "renewed",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&app.catalog)
            .await;
        let token = app.token_for("alice");

        let (status, body) = app
            .json(Method::POST, "/api/auth/refresh", Some(&token), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        let session = app
            .sessions
            .verify(body["sessionToken"].as_str().unwrap())
            .unwrap();
        assert_eq!(session.user_id, UserId::new("alice"));
        assert_eq!(session.access_token, "renewed");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-alice"));
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let app = TestApp::new().await;

        let (status, _) = app.json(Method::POST, "/api/auth/refresh", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Playlists
// =============================================================================

mod playlists {
    use super::*;

    #[tokio::test]
    async fn test_save_then_public_read_keeps_order() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;

        let (status, saved) = app.save(&token, &["a", "b", "c"]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["trackCount"], 3);

        let (status, playlist) = app
            .json(Method::GET, "/api/users/alice/playlist", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(playlist["playlist"]["id"], saved["playlistId"]);
        assert_eq!(playlist["playlist"]["title"], "Best Ever");
        assert_eq!(playlist["playlist"]["ownerId"], "alice");
        assert_eq!(playlist["playlist"]["owner"]["displayName"], "User alice");
        assert_eq!(catalog_ids(&playlist), vec!["a", "b", "c"]);
        assert_eq!(playlist["tracks"][2]["position"], 2);
        assert_eq!(
            playlist["tracks"][0]["track"]["albumArt"],
            "https://img.example/a.jpg"
        );
    }

    #[tokio::test]
    async fn test_resave_replaces_previous_links() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;

        app.save(&token, &["a", "b", "c"]).await;
        let (status, _) = app.save(&token, &["c", "d"]).await;
        assert_eq!(status, StatusCode::OK);

        let (_, playlist) = app
            .json(Method::GET, "/api/me/playlist", Some(&token), None)
            .await;
        assert_eq!(catalog_ids(&playlist), vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_missing_title_uses_default() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;

        let (status, _) = app
            .json(
                Method::PUT,
                "/api/me/playlist",
                Some(&token),
                Some(json!({ "tracks": [track_json("a")] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, playlist) = app
            .json(Method::GET, "/api/users/alice/playlist", None, None)
            .await;
        assert_eq!(playlist["playlist"]["title"], "My Top 100 Tracks");
    }

    #[tokio::test]
    async fn test_save_requires_session() {
        let app = TestApp::new().await;

        let (status, _) = app
            .json(
                Method::PUT,
                "/api/me/playlist",
                None,
                Some(json!({ "tracks": [] })),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_oversized_save_is_rejected() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;
        let ids: Vec<String> = (0..101).map(|i| format!("t{}", i)).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        let (status, _) = app.save(&token, &ids).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .json(Method::GET, "/api/me/playlist", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_tracks_are_rejected() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;

        let (status, body) = app.save(&token, &["a", "b", "a"]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Duplicate"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;

        let (status, _) = app
            .json(
                Method::PUT,
                "/api/me/playlist",
                Some(&token),
                Some(json!({ "tracks": "not a list" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_owner_is_not_found() {
        let app = TestApp::new().await;

        let (status, body) = app
            .json(Method::GET, "/api/users/nobody/playlist", None, None)
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Playlist not found");
    }

    /// Delegates to SQLite but fails every save
    struct FailingSaves(Arc<LocalStorageContext>);

    #[axum::async_trait]
    impl StorageContext for FailingSaves {
        async fn upsert_user(&self, user: UpsertUser) -> top100_core::Result<User> {
            self.0.upsert_user(user).await
        }

        async fn get_user(&self, id: &UserId) -> top100_core::Result<Option<User>> {
            self.0.get_user(id).await
        }

        async fn get_all_users(&self) -> top100_core::Result<Vec<User>> {
            self.0.get_all_users().await
        }

        async fn save_playlist(&self, _playlist: SavePlaylist) -> top100_core::Result<SavedPlaylist> {
            Err(Top100Error::Database("disk I/O error".to_string()))
        }

        async fn get_public_playlist(
            &self,
            owner_id: &UserId,
        ) -> top100_core::Result<Option<PublicPlaylist>> {
            self.0.get_public_playlist(owner_id).await
        }

        async fn cast_vote(&self, vote: CastVote) -> top100_core::Result<Vote> {
            self.0.cast_vote(vote).await
        }

        async fn get_votes(&self, playlist_id: &PlaylistId) -> top100_core::Result<Vec<Vote>> {
            self.0.get_votes(playlist_id).await
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_flat_500() {
        let base = TestApp::new().await;
        let token = base.sign_in("alice").await;
        base.save(&token, &["a"]).await;

        let TestApp {
            db,
            catalog,
            temp_dir,
            ..
        } = base;
        let app = TestApp::with_storage(
            Arc::new(FailingSaves(Arc::clone(&db))),
            db,
            catalog,
            temp_dir,
        );
        let token = app.token_for("alice");

        let (status, body) = app.save(&token, &["b", "c"]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save playlist");

        // Earlier save is untouched
        let (_, playlist) = app
            .json(Method::GET, "/api/users/alice/playlist", None, None)
            .await;
        assert_eq!(catalog_ids(&playlist), vec!["a"]);
    }
}

// =============================================================================
// Votes
// =============================================================================

mod votes {
    use super::*;

    async fn vote(
        app: &TestApp,
        playlist_id: &str,
        body: Value,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        app.json(
            Method::POST,
            &format!("/api/playlists/{}/votes", playlist_id),
            token,
            Some(body),
        )
        .await
    }

    #[tokio::test]
    async fn test_visitor_vote_is_overwritten_by_later_vote() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;
        app.save(&token, &["a", "b"]).await;
        let (playlist_id, track_id) = first_track_of(&app, "alice").await;

        let (status, body) = vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "agree", "sessionId": "visitor-1" }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vote"], "agree");
        assert_eq!(body["trackId"], track_id.as_str());

        vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "disagree", "sessionId": "visitor-1" }),
            None,
        )
        .await;

        let votes = app.db.get_votes(&PlaylistId::new(&playlist_id)).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].voter, Voter::Visitor("visitor-1".to_string()));
        assert_eq!(votes[0].value, VoteValue::Disagree);
    }

    #[tokio::test]
    async fn test_voter_identity_resolution() {
        let app = TestApp::new().await;
        let alice = app.sign_in("alice").await;
        let bob = app.sign_in("bob").await;
        app.save(&alice, &["a"]).await;
        let (playlist_id, track_id) = first_track_of(&app, "alice").await;

        // Signed-in voter: the visitor id is ignored
        vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "agree", "sessionId": "visitor-1" }),
            Some(&bob),
        )
        .await;
        // Two distinct visitors
        vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "agree", "sessionId": "visitor-1" }),
            None,
        )
        .await;
        vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "disagree", "sessionId": "visitor-2" }),
            None,
        )
        .await;
        // No visitor id at all
        vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "agree" }),
            None,
        )
        .await;

        let votes = app.db.get_votes(&PlaylistId::new(&playlist_id)).await.unwrap();
        let mut voters: Vec<String> = votes.iter().map(|v| v.voter.key()).collect();
        voters.sort();
        assert_eq!(
            voters,
            vec![
                "anonymous".to_string(),
                "user:bob".to_string(),
                "visitor:visitor-1".to_string(),
                "visitor:visitor-2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_session_votes_anonymously() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;
        app.save(&token, &["a"]).await;
        let (playlist_id, track_id) = first_track_of(&app, "alice").await;

        let (status, _) = vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "agree", "sessionId": "visitor-9" }),
            Some("expired-or-forged"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let votes = app.db.get_votes(&PlaylistId::new(&playlist_id)).await.unwrap();
        assert_eq!(votes[0].voter, Voter::Visitor("visitor-9".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_playlist_or_track_is_not_found() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;
        app.save(&token, &["a"]).await;
        let (playlist_id, track_id) = first_track_of(&app, "alice").await;

        let (status, _) = vote(
            &app,
            "no-such-playlist",
            json!({ "trackId": track_id, "vote": "agree" }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = vote(
            &app,
            &playlist_id,
            json!({ "trackId": "no-such-track", "vote": "agree" }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Bob's track exists, but not in Alice's playlist
        let bob = app.sign_in("bob").await;
        app.save(&bob, &["b"]).await;
        let (_, bob_track_id) = first_track_of(&app, "bob").await;

        let (status, _) = vote(
            &app,
            &playlist_id,
            json!({ "trackId": bob_track_id, "vote": "agree" }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(app
            .db
            .get_votes(&PlaylistId::new(&playlist_id))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_vote_value_is_bad_request() {
        let app = TestApp::new().await;
        let token = app.sign_in("alice").await;
        app.save(&token, &["a"]).await;
        let (playlist_id, track_id) = first_track_of(&app, "alice").await;

        let (status, _) = vote(
            &app,
            &playlist_id,
            json!({ "trackId": track_id, "vote": "meh" }),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let votes = app.db.get_votes(&PlaylistId::new(&playlist_id)).await.unwrap();
        assert!(votes.is_empty());
    }
}
