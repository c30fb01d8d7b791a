mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgProfileRepo, ProfileRepo};
pub use repo_types::{NewProfile, Profile, ProfileWithUser};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::me_routes())
}
