use std::fmt;

use serde::{Deserialize, Serialize};

use super::jwt::IssuedToken;

/// Request body for login. Fields are optional so that a missing field is
/// reported as missing credentials rather than a body rejection.
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "identifier", alias = "username")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Trimmed `(identifier, password)`, or `None` if either is absent or blank.
    /// Case is kept; the credential store matches emails case-insensitively.
    pub fn credentials(self) -> Option<(String, String)> {
        let email = self.email?.trim().to_owned();
        let password = self.password?;
        if email.is_empty() || password.trim().is_empty() {
            return None;
        }
        Some((email, password))
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub role: String,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            role: issued.claims.role,
        }
    }
}

/// Request body for registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Caller profile, read straight from the verified token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub role: String,
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, password: Option<&str>) -> LoginRequest {
        LoginRequest {
            email: email.map(str::to_owned),
            password: password.map(str::to_owned),
        }
    }

    #[test]
    fn credentials_are_trimmed_but_keep_their_case() {
        let creds = request(Some("  Alice@Example.COM "), Some(" pw ")).credentials();
        assert_eq!(
            creds,
            Some((String::from("Alice@Example.COM"), String::from(" pw ")))
        );
    }

    #[test]
    fn blank_or_absent_fields_yield_none() {
        assert!(request(None, Some("pw")).credentials().is_none());
        assert!(request(Some("a@b.co"), None).credentials().is_none());
        assert!(request(Some("   "), Some("pw")).credentials().is_none());
        assert!(request(Some("a@b.co"), Some("  ")).credentials().is_none());
    }

    #[test]
    fn identifier_aliases_are_accepted() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"identifier":"a@b.co","password":"pw"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"a@b.co","password":"pw"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.co"));
    }

    #[test]
    fn debug_output_hides_the_password() {
        let out = format!("{:?}", request(Some("a@b.co"), Some("hunter22")));
        assert!(!out.contains("hunter22"));
    }
}
