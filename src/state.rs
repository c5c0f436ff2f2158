use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{CredentialStore, PgCredentialStore};
use crate::auth::services;
use crate::config::AppConfig;
use crate::db;
use crate::users::repo::{PgUserStore, UserStore};
use axum::extract::FromRef;
use std::sync::Arc;

/// Shared, read-only per-process state. Everything here is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<dyn CredentialStore>,
    pub users: Arc<dyn UserStore>,
    pub keys: JwtKeys,
    /// Verified against when a login names an unknown user.
    pub decoy_hash: Arc<str>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;
        let credentials = Arc::new(PgCredentialStore::new(db.clone())) as Arc<dyn CredentialStore>;
        let users = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        let decoy_hash = services::decoy_hash().await?;
        Ok(Self::from_parts(config, credentials, users, decoy_hash))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        credentials: Arc<dyn CredentialStore>,
        users: Arc<dyn UserStore>,
        decoy_hash: String,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config,
            credentials,
            users,
            keys,
            decoy_hash: decoy_hash.into(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
