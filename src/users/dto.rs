use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{User, UserChanges};
use crate::auth::services::is_valid_email;

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

/// Admin edit of a user. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    /// Trims every field and checks it; the error is the client message.
    pub fn into_changes(self) -> Result<UserChanges, &'static str> {
        if self.full_name.is_none() && self.email.is_none() && self.role.is_none() {
            return Err("Nothing to update");
        }

        let full_name = self.full_name.map(|n| n.trim().to_string());
        if full_name.as_deref() == Some("") {
            return Err("Full name is required");
        }
        let email = self.email.map(|e| e.trim().to_lowercase());
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            return Err("Invalid email");
        }
        let role = self.role.map(|r| r.trim().to_string());
        if role.as_deref() == Some("") {
            return Err("Role is required");
        }

        Ok(UserChanges {
            full_name,
            email,
            role,
        })
    }
}
