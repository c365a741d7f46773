//! Users Data

use crate::domain::users::records::{PostalAddress, Role, UserUuid};

/// New User Data
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Address to save on a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub address: PostalAddress,
    pub is_default: bool,
}

/// User Update Data. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
