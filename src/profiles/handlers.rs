use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info, instrument};

use super::dto::ProfileView;
use crate::{auth::extractors::AuthUser, error::RepoError, state::AppState};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/my_profile", get(my_profile))
}

/// Requires a bearer token; the `AuthUser` extractor rejects the request first otherwise.
#[instrument(skip(state))]
pub async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileView>, (StatusCode, String)> {
    match state.profiles.get_user_profile(user_id).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(RepoError::NotFound(_)) => {
            info!(user_id, "user has no profile");
            Err((StatusCode::NOT_FOUND, String::new()))
        }
        Err(e) => {
            error!(error = %e, user_id, "get_user_profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
