//! Authentication state for the current session.
//!
//! The flag and the credentials live in one enum so a signed-in state without
//! a token (or a signed-out state holding one) cannot be constructed.

/// Credential store key for the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Credential store key for the signed-in username.
pub const AUTH_USERNAME_KEY: &str = "auth_username";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    inner: Credentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Credentials {
    #[default]
    SignedOut,
    SignedIn { username: String, token: String },
}

impl AuthState {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            inner: Credentials::SignedIn {
                username: username.into(),
                token: token.into(),
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.inner, Credentials::SignedIn { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match &self.inner {
            Credentials::SignedIn { username, .. } => Some(username),
            Credentials::SignedOut => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.inner {
            Credentials::SignedIn { token, .. } => Some(token),
            Credentials::SignedOut => None,
        }
    }
}
