use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::CredentialRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("credential lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Read-only access to stored credentials, keyed by email.
/// Emails match case-insensitively, the same way `users_email_lower_key` keeps them unique.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when no user has this identifier.
    async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, StoreError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT email, password_hash, role
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }
}
