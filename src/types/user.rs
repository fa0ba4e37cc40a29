//! Authentication request and response types.

use serde::{Deserialize, Serialize};

/// Login credentials, sent form-encoded to `/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plaintext password, only ever sent over the wire.
    pub password: String,
}

/// Registration payload, sent as JSON to `/auth/register`. A successful
/// registration returns an [`AuthToken`] directly; no separate login is
/// needed.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Contact email, also the login identity.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub name: String,
}

/// Token issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthToken {
    /// Bearer token attached to subsequent requests.
    pub access_token: String,
    /// Token scheme, `"bearer"` in practice.
    pub token_type: String,
}

/// The authenticated user's profile, from `/auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier, matches `Task::user_id`.
    pub id: String,
    /// Contact email.
    pub email: String,
    /// Display name; the server leaves it unset when the user never
    /// provided one.
    #[serde(default)]
    pub name: Option<String>,
}
