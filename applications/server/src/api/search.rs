/// Track search API route
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use top100_core::CatalogTrack;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub tracks: Vec<CatalogTrack>,
}

/// GET /api/search?q=
/// Search the catalog with the caller's provider token
///
/// The query is checked before the session so a blank search never
/// reaches the provider.
pub async fn search(
    State(app_state): State<AppState>,
    auth: Option<AuthenticatedUser>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Search query is required".to_string()))?;

    let auth = auth.ok_or_else(|| ServerError::Auth("Sign in to search".to_string()))?;

    let tracks = app_state
        .catalog
        .search_tracks(&auth.session().access_token, query)
        .await?;

    tracing::debug!("Search {:?} returned {} tracks", query, tracks.len());

    Ok(Json(SearchResponse { tracks }))
}
