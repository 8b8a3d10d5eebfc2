//! Presence rules shared by every partial update.
//!
//! A string field is applied only when it is present and non-empty, so an
//! empty string cannot clear a value. Counters and flags are applied whenever
//! present.

use crate::error::{AppError, AppResult};

pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Overwrites `target` when `value` survived the presence rules.
#[cfg(test)]
pub fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// How an update finds its account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Id(String),
    Email(String),
}

impl AccountLookup {
    /// The id wins when both are supplied.
    pub fn resolve(id: Option<String>, email: Option<String>) -> AppResult<Self> {
        match (non_empty(id), non_empty(email)) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(email)) => Ok(Self::Email(crate::auth::services::normalize_email(&email))),
            (None, None) => Err(AppError::bad_request("an id or email_address is required")),
        }
    }
}
