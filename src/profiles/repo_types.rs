use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::error::RepoError;
use crate::users::PublicUser;

pub const COMMENT_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub comment: String,
    pub birthday: Date,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: i64,
    pub comment: String,
    pub birthday: Date,
}

impl NewProfile {
    pub fn validate(&self) -> Result<(), RepoError> {
        if self.comment.chars().count() > COMMENT_MAX_LEN {
            return Err(RepoError::Invalid(format!(
                "comment longer than {COMMENT_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProfileWithUser {
    pub profile: Profile,
    pub user: PublicUser,
}

#[derive(Debug, FromRow)]
pub struct ProfileUserRow {
    pub id: i64,
    pub user_id: i64,
    pub comment: String,
    pub birthday: Date,
    pub username: Option<String>,
}

impl From<ProfileUserRow> for ProfileWithUser {
    fn from(r: ProfileUserRow) -> Self {
        Self {
            user: PublicUser {
                id: r.user_id,
                username: r.username,
            },
            profile: Profile {
                id: r.id,
                user_id: r.user_id,
                comment: r.comment,
                birthday: r.birthday,
            },
        }
    }
}
