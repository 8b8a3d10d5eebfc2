use serde::Deserialize;

/// Request body for password login (students and teachers).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login through the external identity provider.
#[derive(Debug, Deserialize)]
pub struct ExternalLoginRequest {
    pub id_token: String,
    /// Optional; when given it must match the token's email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a credential check. `profile` is only filled when `is_valid`.
#[derive(Debug)]
pub struct LoginOutcome<P> {
    pub is_valid: bool,
    pub profile: Option<P>,
}

impl<P> LoginOutcome<P> {
    pub fn valid(profile: P) -> Self {
        Self {
            is_valid: true,
            profile: Some(profile),
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            profile: None,
        }
    }
}
