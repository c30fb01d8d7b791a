use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User, UserStatus};
use crate::error::RepoError;

/// Storage operations on users.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    /// Delete a user together with their posts and profile.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    /// Users whose status text equals `status`. `None` or an empty string
    /// returns every user; unknown text matches nothing.
    async fn by_status(&self, status: Option<&str>) -> Result<Vec<User>, RepoError>;

    async fn active_users(&self) -> Result<Vec<User>, RepoError> {
        self.by_status(Some(UserStatus::Active.as_str())).await
    }
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        new.validate()?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (status, email, password, facebook_user_id, username, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, status, email, password, facebook_user_id, username,
                      is_staff, is_superuser, created_at
            "#,
        )
        .bind(new.status)
        .bind(&new.email)
        .bind(&new.password)
        .bind(&new.facebook_user_id)
        .bind(&new.username)
        .bind(new.is_staff)
        .bind(new.is_superuser)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, status, email, password, facebook_user_id, username,
                   is_staff, is_superuser, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        // posts and profiles go with it via ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::NotFound("user"));
        }
        Ok(())
    }

    async fn by_status(&self, status: Option<&str>) -> Result<Vec<User>, RepoError> {
        let status = status.filter(|s| !s.is_empty());
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, status, email, password, facebook_user_id, username,
                   is_staff, is_superuser, created_at
            FROM users
            WHERE $1::text IS NULL OR status::text = $1
            ORDER BY id
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
