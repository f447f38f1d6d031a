//! HTTP routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::SearchCapability;
use crate::error::{ApiError, ApiResult};
use crate::models::PapersResponse;
use crate::papers;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Search capability used by every request. Immutable.
    pub search: Arc<dyn SearchCapability>,
}

/// Create the HTTP router.
pub fn create_router(search: Arc<dyn SearchCapability>) -> Router {
    let state = AppState { search };

    Router::new()
        .route("/api/scholar", get(get_scholar_papers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// `GET /api/scholar?field=<text>`
///
/// The first `field` parameter wins when it is repeated.
async fn get_scholar_papers(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<PapersResponse>> {
    let field = params
        .into_iter()
        .find_map(|(key, value)| (key == "field").then_some(value))
        .filter(|field| !field.is_empty())
        .ok_or(ApiError::Validation)?;

    let papers = papers::fetch_papers(state.search.as_ref(), &field).await.map_err(|e| {
        tracing::error!(field = %field, error = %e, "Error fetching from Google Scholar");
        ApiError::from(e)
    })?;

    tracing::debug!(field = %field, count = papers.len(), "Returning papers");
    Ok(Json(PapersResponse { papers }))
}
