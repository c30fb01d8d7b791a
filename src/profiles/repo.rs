use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewProfile, Profile, ProfileUserRow, ProfileWithUser};
use crate::error::RepoError;

/// Storage operations on profiles. A user has at most one.
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn create(&self, new: NewProfile) -> Result<Profile, RepoError>;

    /// The user's profile, or `RepoError::NotFound` when they have none.
    async fn get_user_profile(&self, user_id: i64) -> Result<ProfileWithUser, RepoError>;
}

#[derive(Clone)]
pub struct PgProfileRepo {
    db: PgPool,
}

impl PgProfileRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepo for PgProfileRepo {
    async fn create(&self, new: NewProfile) -> Result<Profile, RepoError> {
        new.validate()?;
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, comment, birthday)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, comment, birthday
            "#,
        )
        .bind(new.user_id)
        .bind(&new.comment)
        .bind(new.birthday)
        .fetch_one(&self.db)
        .await?;
        Ok(profile)
    }

    async fn get_user_profile(&self, user_id: i64) -> Result<ProfileWithUser, RepoError> {
        let row = sqlx::query_as::<_, ProfileUserRow>(
            r#"
            SELECT p.id, p.user_id, p.comment, p.birthday, u.username
              FROM profiles p
              JOIN users u ON u.id = p.user_id
             WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound("profile"))?;
        Ok(row.into())
    }
}
