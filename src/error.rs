use thiserror::Error;

/// Failures surfaced by the repositories.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                let constraint = db.constraint().unwrap_or("unique").to_string();
                return RepoError::UniqueViolation(constraint);
            }
            // every foreign key in the schema references users
            if db.is_foreign_key_violation() {
                return RepoError::NotFound("user");
            }
        }
        RepoError::Database(e)
    }
}
