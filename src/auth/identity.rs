use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::config::{IdentityConfig, IdentityKey};

/// Claims read from an external provider's identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub email_verified: bool,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
}

// Some providers send `"email_verified": "true"`.
fn bool_or_string<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Str(String),
    }
    Ok(match Flag::deserialize(d)? {
        Flag::Bool(b) => b,
        Flag::Str(s) => s.eq_ignore_ascii_case("true"),
    })
}

/// Checks signature, issuer, audience and expiry of identity tokens.
pub struct IdentityVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn from_config(cfg: &IdentityConfig) -> anyhow::Result<Self> {
        let (decoding, alg) = match &cfg.key {
            IdentityKey::RsaPem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
            IdentityKey::Hs256Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };
        let mut validation = Validation::new(alg);
        validation.set_audience(std::slice::from_ref(&cfg.audience));
        validation.set_issuer(std::slice::from_ref(&cfg.issuer));
        Ok(Self {
            decoding,
            validation,
        })
    }

    /// Returns the verified email carried by `token`.
    pub fn verify(&self, token: &str) -> anyhow::Result<String> {
        let data = decode::<IdentityClaims>(token, &self.decoding, &self.validation)?;
        if !data.claims.email_verified {
            warn!(email = %data.claims.email, "identity token for unverified email");
            anyhow::bail!("email not verified by identity provider");
        }
        debug!(email = %data.claims.email, "identity token verified");
        Ok(data.claims.email)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    pub const SECRET: &str = "identity-test-secret";
    pub const ISSUER: &str = "https://idp.test";
    pub const AUDIENCE: &str = "tutorhub-test";

    pub fn config() -> IdentityConfig {
        IdentityConfig {
            issuer: ISSUER.into(),
            audience: AUDIENCE.into(),
            key: IdentityKey::Hs256Secret(SECRET.into()),
        }
    }

    pub fn mint(email: &str, verified: serde_json::Value, aud: &str) -> String {
        let exp = (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp();
        let claims = serde_json::json!({
            "email": email,
            "email_verified": verified,
            "iss": ISSUER,
            "aud": aud,
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("sign test token")
    }
}
