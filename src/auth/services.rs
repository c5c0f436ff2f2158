use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::auth::{
    dto::LoginRequest,
    errors::LoginError,
    jwt::{IssuedToken, JwtKeys},
    password,
    repo::{CredentialStore, StoreError},
};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid");
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Argon2 is CPU bound; run it off the async workers.
pub async fn hash_password(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain)).await?
}

async fn verify_password(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash)).await?
}

/// Hash of a random secret, checked when the identifier is unknown so both
/// rejections cost one Argon2 verification. Built once at startup.
pub async fn decoy_hash() -> anyhow::Result<String> {
    hash_password(uuid::Uuid::new_v4().to_string()).await
}

/// Runs one login attempt: validate, look up, verify, issue.
pub async fn authenticate(
    store: &dyn CredentialStore,
    keys: &JwtKeys,
    lookup_timeout: Duration,
    decoy_hash: &str,
    request: LoginRequest,
) -> Result<IssuedToken, LoginError> {
    let (email, plain) = request.credentials().ok_or_else(|| {
        warn!("login missing credentials");
        LoginError::MissingCredentials
    })?;

    let record = match timeout(lookup_timeout, store.lookup(&email)).await {
        Ok(Ok(Some(record))) => record,
        Ok(Ok(None)) => {
            let _ = verify_password(plain, decoy_hash.to_owned()).await;
            warn!(email = %email, "login unknown email");
            return Err(LoginError::InvalidCredentials);
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(StoreError::Timeout(lookup_timeout).into()),
    };

    let ok = verify_password(plain, record.password_hash)
        .await
        .map_err(LoginError::Password)?;
    if !ok {
        warn!(email = %email, "login invalid password");
        return Err(LoginError::InvalidCredentials);
    }

    let issued = keys.issue(&record.email, &record.role)?;
    info!(email = %record.email, role = %record.role, "user logged in");
    Ok(issued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::CredentialRecord;
    use crate::state::testing::{test_decoy_hash, test_keys, FakeStore};

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[tokio::test]
    async fn valid_credentials_issue_a_token_for_the_stored_role() {
        let store = FakeStore::with_user("alice@example.com", "correct-pw", "pm");
        let keys = test_keys();
        let issued = authenticate(&store, &keys, TIMEOUT, test_decoy_hash(), login("alice@example.com", "correct-pw"))
            .await
            .expect("login should succeed");
        let claims = keys.verify(&issued.token).expect("token verifies");
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.role, "pm");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_the_same_error() {
        let store = FakeStore::with_user("alice@example.com", "correct-pw", "pm");
        let keys = test_keys();
        let wrong = authenticate(&store, &keys, TIMEOUT, test_decoy_hash(), login("alice@example.com", "wrong-pw"))
            .await
            .unwrap_err();
        let unknown = authenticate(&store, &keys, TIMEOUT, test_decoy_hash(), login("nobody@example.com", "wrong-pw"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, LoginError::InvalidCredentials));
        assert!(matches!(unknown, LoginError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_store() {
        let store = FakeStore::with_user("alice@example.com", "correct-pw", "pm");
        let keys = test_keys();
        let req = LoginRequest {
            email: Some("alice@example.com".into()),
            password: None,
        };
        let err = authenticate(&store, &keys, TIMEOUT, test_decoy_hash(), req).await.unwrap_err();
        assert!(matches!(err, LoginError::MissingCredentials));
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_not_invalid_credentials() {
        let store = FakeStore::failing();
        let err = authenticate(&store, &test_keys(), TIMEOUT, test_decoy_hash(), login("alice@example.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let store = FakeStore::with_user("alice@example.com", "correct-pw", "pm")
            .delayed(Duration::from_millis(200));
        let err = authenticate(
            &store,
            &test_keys(),
            Duration::from_millis(20),
            test_decoy_hash(),
            login("alice@example.com", "correct-pw"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LoginError::Store(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_a_server_error() {
        let store = FakeStore::from_records(vec![CredentialRecord {
            email: "alice@example.com".into(),
            password_hash: "correct-pw".into(),
            role: "pm".into(),
        }]);
        let err = authenticate(&store, &test_keys(), TIMEOUT, test_decoy_hash(), login("alice@example.com", "correct-pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Password(_)));
    }

    #[tokio::test]
    async fn mixed_case_stored_email_logs_in_with_any_case() {
        let store = FakeStore::with_user("Alice@Example.com", "correct-pw", "pm");
        let keys = test_keys();
        for typed in ["Alice@Example.com", "alice@example.com", " ALICE@EXAMPLE.COM "] {
            let issued = authenticate(&store, &keys, TIMEOUT, test_decoy_hash(), login(typed, "correct-pw"))
                .await
                .unwrap_or_else(|e| panic!("{typed:?} should log in: {e}"));
            let claims = keys.verify(&issued.token).expect("token verifies");
            assert_eq!(claims.sub, "Alice@Example.com");
        }
    }

    #[tokio::test]
    async fn decoy_hash_is_a_real_argon2_hash() {
        let decoy = decoy_hash().await.expect("decoy hash");
        assert!(decoy.starts_with("$argon2"));
        assert!(!password::verify_password("decoy-password", &decoy).unwrap());
    }
}
