use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Registration, Verification};
use crate::db::StoreResult;

#[async_trait]
pub trait RegistrationRepo: Send + Sync {
    /// `false` when the code already exists.
    async fn insert_registration(&self, registration: &Registration) -> StoreResult<bool>;
    async fn find_registration(&self, code: &str) -> StoreResult<Option<Registration>>;
    /// `false` when the token already exists.
    async fn insert_verification(&self, verification: &Verification) -> StoreResult<bool>;
}

pub struct PgRegistrationRepo {
    db: PgPool,
}

impl PgRegistrationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationRepo for PgRegistrationRepo {
    async fn insert_registration(&self, r: &Registration) -> StoreResult<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO registrations (registration_code, first_name, last_name, email_address)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (registration_code) DO NOTHING
            "#,
        )
        .bind(&r.registration_code)
        .bind(&r.first_name)
        .bind(&r.last_name)
        .bind(&r.email_address)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn find_registration(&self, code: &str) -> StoreResult<Option<Registration>> {
        let row = sqlx::query_as::<_, Registration>(
            r#"
            SELECT registration_code, first_name, last_name, email_address
            FROM registrations
            WHERE registration_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert_verification(&self, v: &Verification) -> StoreResult<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO verifications (token, email, is_verified, registration_code, is_registered)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(&v.token)
        .bind(&v.email)
        .bind(v.is_verified)
        .bind(&v.registration_code)
        .bind(v.is_registered)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryRegistrationRepo {
        registrations: Mutex<HashMap<String, Registration>>,
        verifications: Mutex<HashMap<String, Verification>>,
    }

    #[async_trait]
    impl RegistrationRepo for MemoryRegistrationRepo {
        async fn insert_registration(&self, registration: &Registration) -> StoreResult<bool> {
            let mut map = self.registrations.lock().await;
            if map.contains_key(&registration.registration_code) {
                return Ok(false);
            }
            map.insert(registration.registration_code.clone(), registration.clone());
            Ok(true)
        }

        async fn find_registration(&self, code: &str) -> StoreResult<Option<Registration>> {
            Ok(self.registrations.lock().await.get(code).cloned())
        }

        async fn insert_verification(&self, verification: &Verification) -> StoreResult<bool> {
            let mut map = self.verifications.lock().await;
            if map.contains_key(&verification.token) {
                return Ok(false);
            }
            map.insert(verification.token.clone(), verification.clone());
            Ok(true)
        }
    }
}
