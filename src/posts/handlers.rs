use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{debug, error, instrument};

use super::dto::PostView;
use super::services::published_posts;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/published_posts", get(list_published))
}

#[instrument(skip(state))]
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostView>>, (StatusCode, String)> {
    let posts = published_posts(state.posts.as_ref()).await.map_err(|e| {
        error!(error = %e, "published_posts failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    debug!(count = posts.len(), "published posts loaded");
    Ok(Json(posts.into_iter().map(PostView::from).collect()))
}
