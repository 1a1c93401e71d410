/// HTTP routing
use crate::{api, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the API router
pub fn create_router(app_state: AppState) -> Router {
    let sessions = Arc::clone(&app_state.sessions);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/login", get(api::auth::login))
        .route("/auth/callback", get(api::auth::callback))
        .route(
            "/users/:user_id/playlist",
            get(api::playlists::get_public_playlist),
        );

    // Routes where the handler decides what a missing session means
    let optional_routes = Router::new()
        .route("/search", get(api::search::search))
        .route(
            "/playlists/:playlist_id/votes",
            post(api::votes::cast_vote),
        )
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&sessions),
            middleware::optional_auth_middleware,
        ));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/refresh", post(api::auth::refresh))
        .route(
            "/me/playlist",
            get(api::playlists::get_my_playlist).put(api::playlists::save_my_playlist),
        )
        .layer(axum_middleware::from_fn_with_state(
            sessions,
            middleware::auth_middleware,
        ));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(optional_routes).merge(protected_routes),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
