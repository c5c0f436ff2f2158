use thiserror::Error;

use super::{jwt::TokenError, repo::StoreError};
use crate::error::ApiError;

/// Why a login attempt was rejected.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Missing credentials")]
    MissingCredentials,

    /// Unknown identifier and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password verification failed: {0}")]
    Password(anyhow::Error),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::MissingCredentials => ApiError::BadRequest(err.to_string()),
            LoginError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            LoginError::Store(_) | LoginError::Password(_) | LoginError::Token(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// Why a bearer token was not accepted on a protected route.
#[derive(Debug, Error)]
pub enum BearerError {
    #[error("Missing bearer token")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

impl From<TokenError> for BearerError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => BearerError::Expired,
            _ => BearerError::Invalid,
        }
    }
}

impl From<BearerError> for ApiError {
    fn from(err: BearerError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}
