use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct Registration {
    pub registration_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

/// Stored as received; missing fields default to empty/false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default, rename_all = "camelCase")]
pub struct Verification {
    pub token: String,
    pub email: String,
    pub is_verified: bool,
    pub registration_code: String,
    pub is_registered: bool,
}
