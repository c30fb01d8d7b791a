use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::RepoError;

pub const USERNAME_MAX_LEN: usize = 255;

/// Account lifecycle state. Transitions happen outside this service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    #[default]
    EmailConfirming,
    Deactivated,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::EmailConfirming => "email_confirming",
            UserStatus::Deactivated => "deactivated",
        }
    }
}

impl FromStr for UserStatus {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "email_confirming" => Ok(UserStatus::EmailConfirming),
            "deactivated" => Ok(UserStatus::Deactivated),
            other => Err(RepoError::Invalid(format!("unknown user status {other:?}"))),
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub status: UserStatus,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Option<String>, // opaque hash, never exposed in JSON
    pub facebook_user_id: Option<String>,
    pub username: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// Insert payload for a user; `created_at` is assigned by storage.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub status: UserStatus,
    pub email: String,
    pub password: Option<String>,
    pub facebook_user_id: Option<String>,
    pub username: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        if !is_valid_email(&self.email) {
            return Err(RepoError::Invalid(format!("invalid email {:?}", self.email)));
        }
        if let Some(username) = &self.username {
            if username.chars().count() > USERNAME_MAX_LEN {
                return Err(RepoError::Invalid("username too long".into()));
            }
        }
        Ok(())
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
