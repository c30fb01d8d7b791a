mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgPostRepo, PostRepo};
pub use repo_types::{NewPost, Post, PostWithAuthor};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
