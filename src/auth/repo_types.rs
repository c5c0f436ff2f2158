use sqlx::FromRow;

/// The credential columns of a user row: everything login needs, nothing else.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRecord {
    pub email: String,         // canonical identifier, unique
    pub password_hash: String, // Argon2 PHC string, never serialized
    pub role: String,          // opaque role name
}
