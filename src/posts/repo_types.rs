use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::RepoError;
use crate::users::PublicUser;

pub const TITLE_MAX_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub text: String,
    pub created_date: OffsetDateTime,
    pub published_date: Option<OffsetDateTime>,
}

impl Post {
    /// Published means a publication date exists and is not in the future.
    pub fn is_published(&self, now: OffsetDateTime) -> bool {
        matches!(self.published_date, Some(at) if at <= now)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub text: String,
    pub published_date: Option<OffsetDateTime>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), RepoError> {
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(RepoError::Invalid(format!(
                "title longer than {TITLE_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// A post with its author's public fields, loaded in one query.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: PublicUser,
}

#[derive(Debug, FromRow)]
pub struct PostAuthorRow {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub text: String,
    pub created_date: OffsetDateTime,
    pub published_date: Option<OffsetDateTime>,
    pub author_username: Option<String>,
}

impl From<PostAuthorRow> for PostWithAuthor {
    fn from(r: PostAuthorRow) -> Self {
        Self {
            author: PublicUser {
                id: r.author_id,
                username: r.author_username,
            },
            post: Post {
                id: r.id,
                author_id: r.author_id,
                title: r.title,
                text: r.text,
                created_date: r.created_date,
                published_date: r.published_date,
            },
        }
    }
}
