use std::{future::Future, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Failure of a single storage call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage call exceeded its {0:?} deadline")]
    Timeout(Duration),
    #[error("{0} already exists")]
    Duplicate(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_timeout)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Turns a unique-constraint violation into [`StoreError::Duplicate`]. A hit on
/// `pkey` names `id_field`; any other unique index is the email.
pub fn on_unique_violation(e: sqlx::Error, pkey: &str, id_field: &'static str) -> StoreError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.constraint() == Some(pkey) {
                StoreError::Duplicate(id_field)
            } else {
                StoreError::Duplicate("Email")
            }
        }
        e => e.into(),
    }
}

/// Runs one storage call under `limit`. On expiry the future is dropped, which
/// hands any checked-out connection back to the pool.
pub async fn with_deadline<T, F>(limit: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_passes_through_results() {
        let ok = with_deadline(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);
    }

    #[tokio::test]
    async fn deadline_expires_slow_calls() {
        let slow = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, StoreError>(())
        })
        .await;
        assert!(matches!(slow, Err(StoreError::Timeout(_))));
    }
}
