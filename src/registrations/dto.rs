use serde::{Deserialize, Serialize};

use super::repo_types::Registration;

#[derive(Debug, Deserialize)]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub registration_code: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_address: String,
}

/// Shared by create and validate: the registration fields plus `is_valid`.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub is_valid: bool,
    #[serde(flatten)]
    pub registration: Registration,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRegistrationRequest {
    #[serde(default)]
    pub registration_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVerificationResponse {
    pub is_created: bool,
}
