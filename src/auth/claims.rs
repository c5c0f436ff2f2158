use serde::{Deserialize, Serialize};

/// JWT payload issued on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,  // identifier (email)
    pub role: String, // snapshot of the stored role
    pub iat: i64,     // issued at (unix timestamp)
    pub exp: i64,     // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
    pub jti: String,  // unique token id
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
