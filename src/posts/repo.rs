use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_types::{NewPost, Post, PostAuthorRow, PostWithAuthor};
use crate::error::RepoError;

/// Storage operations on posts.
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, new: NewPost) -> Result<Post, RepoError>;

    /// Posts with a publication date at or before `now`, with their authors, in id order.
    async fn published_before(&self, now: OffsetDateTime)
        -> Result<Vec<PostWithAuthor>, RepoError>;

    /// Set the publication date of one post and persist it.
    async fn publish(&self, id: i64, at: OffsetDateTime) -> Result<Post, RepoError>;
}

#[derive(Clone)]
pub struct PgPostRepo {
    db: PgPool,
}

impl PgPostRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        new.validate()?;
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, title, text, published_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, title, text, created_date, published_date
            "#,
        )
        .bind(new.author_id)
        .bind(&new.title)
        .bind(&new.text)
        .bind(new.published_date)
        .fetch_one(&self.db)
        .await?;
        Ok(post)
    }

    async fn published_before(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let rows = sqlx::query_as::<_, PostAuthorRow>(
            r#"
            SELECT p.id, p.author_id, p.title, p.text, p.created_date, p.published_date,
                   u.username AS author_username
              FROM posts p
              JOIN users u ON u.id = p.author_id
             WHERE p.published_date IS NOT NULL
               AND p.published_date <= $1
             ORDER BY p.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn publish(&self, id: i64, at: OffsetDateTime) -> Result<Post, RepoError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
               SET published_date = $2
             WHERE id = $1
            RETURNING id, author_id, title, text, created_date, published_date
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound("post"))?;
        Ok(post)
    }
}
