use serde::Serialize;
use time::OffsetDateTime;

use super::repo_types::PostWithAuthor;
use crate::users::PublicUser;

/// External shape of a post.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: i64,
    pub author: PublicUser,
    pub title: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_date: Option<OffsetDateTime>,
}

impl From<PostWithAuthor> for PostView {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            id: p.post.id,
            author: p.author,
            title: p.post.title,
            text: p.post.text,
            published_date: p.post.published_date,
        }
    }
}
