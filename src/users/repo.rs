use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String, // unique ignoring case, the login identifier
    pub password_hash: String, // never leaves the server, see PublicUser
    pub role: String,
    pub created_at: OffsetDateTime,
}

/// Row to insert on registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Partial update; `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("email already registered")]
    EmailTaken,

    #[error("user store unavailable: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UserStoreError> for ApiError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::EmailTaken => ApiError::Conflict("Email already registered".into()),
            UserStoreError::Database(e) => e.into(),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// A duplicate email, in any case, is `EmailTaken`.
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;
    /// Oldest first; `role` filters by exact match.
    async fn list(&self, role: Option<&str>) -> Result<Vec<User>, UserStoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError>;
    /// `Ok(None)` when no user has this id.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, UserStoreError>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, UserStoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn email_taken_or(e: sqlx::Error) -> UserStoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => UserStoreError::EmailTaken,
        _ => UserStoreError::Database(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, full_name, email, password_hash, role, created_at
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.db)
        .await
        .map_err(email_taken_or)
    }

    async fn list(&self, role: Option<&str>) -> Result<Vec<User>, UserStoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password_hash, role, created_at
            FROM users
            WHERE ($1::text IS NULL OR role = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, UserStoreError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                email     = COALESCE($3, email),
                role      = COALESCE($4, role)
            WHERE id = $1
            RETURNING id, full_name, email, password_hash, role, created_at
            "#,
        )
        .bind(id)
        .bind(changes.full_name)
        .bind(changes.email)
        .bind(changes.role)
        .fetch_optional(&self.db)
        .await
        .map_err(email_taken_or)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
