pub mod dto;
pub mod repo;
pub mod repo_types;

pub use dto::PublicUser;
pub use repo::{PgUserRepo, UserRepo};
pub use repo_types::{NewUser, User, UserStatus};
