use serde::Serialize;
use time::Date;

use super::repo_types::ProfileWithUser;
use crate::users::PublicUser;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// External shape of a profile.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: i64,
    pub user: PublicUser,
    pub comment: String,
    #[serde(with = "iso_date")]
    pub birthday: Date,
}

impl From<ProfileWithUser> for ProfileView {
    fn from(p: ProfileWithUser) -> Self {
        Self {
            id: p.profile.id,
            user: p.user,
            comment: p.profile.comment,
            birthday: p.profile.birthday,
        }
    }
}
