use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::errors::{CloudErrKind, CloudResult};

pub const MAX_USERNAME_LENGTH: usize = 32;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub auth_provider: AuthProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The name the UI greets the user by.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

/// An authenticated session, replaced wholesale on login / logout. `remember`
/// decides whether the session outlives the process (written to disk) or dies
/// with it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub remember: bool,
    pub user: User,
}

/// The subset of a Google ID token's payload the client cares about. Decoded
/// locally for immediate feedback only; the server re-validates the token
/// independently.
#[derive(Deserialize, Debug, Clone)]
pub struct GoogleClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
}

impl GoogleClaims {
    /// Decodes the payload segment of a Google ID token (a JWT) without
    /// verifying its signature.
    pub fn from_id_token(id_token: &str) -> CloudResult<GoogleClaims> {
        let payload = id_token
            .split('.')
            .nth(1)
            .ok_or(CloudErrKind::GoogleTokenInvalid)?;
        let bytes = base64::decode_config(payload, base64::URL_SAFE_NO_PAD)
            .map_err(|_| CloudErrKind::GoogleTokenInvalid)?;
        serde_json::from_slice(&bytes).map_err(|_| CloudErrKind::GoogleTokenInvalid.into())
    }
}

#[cfg(test)]
mod unit_tests {
    use crate::model::account::GoogleClaims;
    use crate::model::errors::CloudErrKind;

    fn fake_id_token(payload: &str) -> String {
        let header = base64::encode_config(r#"{"alg":"RS256","typ":"JWT"}"#, base64::URL_SAFE_NO_PAD);
        let payload = base64::encode_config(payload, base64::URL_SAFE_NO_PAD);
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn decodes_google_payload() {
        let token =
            fake_id_token(r#"{"sub":"108","email":"amy@example.com","name":"Amy","exp":1754000000}"#);
        let claims = GoogleClaims::from_id_token(&token).unwrap();
        assert_eq!(claims.email, "amy@example.com");
        assert_eq!(claims.name.as_deref(), Some("Amy"));
    }

    #[test]
    fn rejects_garbage_token() {
        let err = GoogleClaims::from_id_token("not-a-jwt").unwrap_err();
        assert_eq!(err.kind, CloudErrKind::GoogleTokenInvalid);
    }
}
