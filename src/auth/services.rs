use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{ExternalLoginRequest, LoginOutcome},
        identity::IdentityVerifier,
        password::{CredentialHasher, Credentials},
    },
    error::{AppError, AppResult},
};

/// A stored account row that carries a password hash and its salt.
pub trait Credentialed {
    fn account_id(&self) -> &str;
    fn salt(&self) -> &str;
    fn password_hash(&self) -> &str;
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are stored and looked up trimmed and lowercased.
pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Argon2 runs on the blocking pool so it does not stall the runtime.
pub async fn issue_credentials(
    hasher: &CredentialHasher,
    password: String,
    email: String,
) -> AppResult<Credentials> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.issue(&password, &email))
        .await
        .map_err(|e| AppError::Other(e.into()))?
}

pub async fn check_password(
    hasher: &CredentialHasher,
    password: String,
    salt: String,
    password_hash: String,
) -> AppResult<bool> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &salt, &password_hash))
        .await
        .map_err(|e| AppError::Other(e.into()))?
}

/// Compares `password` against the row found by email. An unknown email and a
/// wrong password both come back as an invalid outcome, logged apart.
pub async fn check_login<A: Credentialed>(
    hasher: &CredentialHasher,
    found: Option<A>,
    email: &str,
    password: String,
) -> AppResult<LoginOutcome<A>> {
    let Some(account) = found else {
        warn!(%email, "login unknown email");
        return Ok(LoginOutcome::invalid());
    };
    let valid = check_password(
        hasher,
        password,
        account.salt().to_string(),
        account.password_hash().to_string(),
    )
    .await?;
    if !valid {
        warn!(account_id = %account.account_id(), "login invalid password");
        return Ok(LoginOutcome::invalid());
    }
    info!(account_id = %account.account_id(), "login ok");
    Ok(LoginOutcome::valid(account))
}

/// Returns the normalized email proven by the request's identity token.
pub fn verified_identity_email(
    verifier: Option<&IdentityVerifier>,
    req: &ExternalLoginRequest,
) -> AppResult<String> {
    let Some(verifier) = verifier else {
        return Err(AppError::Unavailable(
            "external login is not configured".into(),
        ));
    };
    let email = verifier.verify(&req.id_token).map_err(|e| {
        warn!(error = %e, "identity token rejected");
        AppError::Unauthorized("Invalid identity token".into())
    })?;
    let email = normalize_email(&email);
    if let Some(claimed) = req.email.as_deref().filter(|c| !c.is_empty()) {
        if normalize_email(claimed) != email {
            warn!(%email, "identity token email does not match request");
            return Err(AppError::Unauthorized("Invalid identity token".into()));
        }
    }
    Ok(email)
}
