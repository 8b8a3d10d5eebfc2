use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use tracing::{error, warn};

use crate::{
    config::PasswordConfig,
    error::{AppError, AppResult},
};

/// Bytes of CSPRNG output behind the stored account salt.
pub const SALT_LEN: usize = 10;

/// Hash and salt of one account. Always produced together by [`CredentialHasher::issue`].
#[derive(Debug, Clone)]
pub struct Credentials {
    pub password_hash: String,
    pub salt: String,
}

/// Base64 of [`SALT_LEN`] random bytes. When the generator fails the email
/// address is used instead, so account creation never aborts here.
pub fn generate_salt<R: RngCore>(rng: &mut R, email: &str) -> String {
    let mut buf = [0u8; SALT_LEN];
    match rng.try_fill_bytes(&mut buf) {
        Ok(()) => Base64::encode_string(&buf),
        Err(e) => {
            warn!(error = %e, "salt generation failed; falling back to email address");
            email.to_string()
        }
    }
}

#[derive(Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(cfg: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Fresh salt plus `argon2id(password + salt)`.
    pub fn issue(&self, plain: &str, email: &str) -> AppResult<Credentials> {
        let salt = generate_salt(&mut OsRng, email);
        let password_hash = self.hash(plain, &salt)?;
        Ok(Credentials {
            password_hash,
            salt,
        })
    }

    fn hash(&self, plain: &str, salt: &str) -> AppResult<String> {
        let phc_salt = SaltString::generate(&mut OsRng);
        let salted = format!("{plain}{salt}");
        self.argon2()
            .hash_password(salted.as_bytes(), &phc_salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AppError::Hashing(e.to_string())
            })
    }

    /// Constant-time check of `plain + salt` against the stored PHC string.
    /// Cost parameters are read from the stored hash, not from `self`.
    pub fn verify(&self, plain: &str, salt: &str, password_hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(password_hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AppError::Hashing(e.to_string())
        })?;
        let salted = format!("{plain}{salt}");
        Ok(self
            .argon2()
            .verify_password(salted.as_bytes(), &parsed)
            .is_ok())
    }
}
