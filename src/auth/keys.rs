use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use tracing::{debug, warn};
use uuid::Uuid;

/// Per-account PEM public keys, kept apart from the account tables.
#[async_trait]
pub trait PublicKeyStore: Send + Sync {
    /// Writes or overwrites the key for `account_id`. Last write wins.
    async fn save(&self, account_id: &str, public_key_pem: &str) -> anyhow::Result<()>;
}

/// File stem for an account id: unpadded base64url of its bytes. Distinct ids
/// never share a file and the stem cannot contain `/` or `.`.
pub fn key_file_stem(account_id: &str) -> String {
    Base64UrlUnpadded::encode_string(account_id.as_bytes())
}

/// One `<stem>.pem` file per account under `dir`.
#[derive(Debug, Clone)]
pub struct FsKeyStore {
    dir: PathBuf,
}

impl FsKeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, account_id: &str) -> PathBuf {
        self.dir.join(format!("{}.pem", key_file_stem(account_id)))
    }
}

#[async_trait]
impl PublicKeyStore for FsKeyStore {
    async fn save(&self, account_id: &str, public_key_pem: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create key dir {}", self.dir.display()))?;

        let target = self.path_for(account_id);
        // Concurrent writers each get their own temp file; the rename is atomic.
        let tmp = self.dir.join(format!(
            ".{}.{}.tmp",
            key_file_stem(account_id),
            Uuid::new_v4().simple()
        ));
        tokio::fs::write(&tmp, public_key_pem.as_bytes())
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("rename into {}", target.display()));
        }

        debug!(path = %target.display(), "public key stored");
        Ok(())
    }
}

/// Best-effort key write after the account row is in place. A failure is
/// logged and swallowed: the account write it follows already succeeded.
pub async fn store_public_key(keys: &dyn PublicKeyStore, account_id: &str, pem: Option<&str>) {
    let Some(pem) = pem.filter(|p| !p.is_empty()) else {
        return;
    };
    if let Err(e) = keys.save(account_id, pem).await {
        warn!(error = %e, %account_id, "public key could not be stored");
    }
}

#[cfg(test)]
pub mod memory {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicBool, Ordering},
    };

    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryKeyStore {
        keys: Mutex<HashMap<String, String>>,
        failing: AtomicBool,
    }

    impl MemoryKeyStore {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub async fn get(&self, account_id: &str) -> Option<String> {
            self.keys.lock().await.get(&key_file_stem(account_id)).cloned()
        }
    }

    #[async_trait]
    impl PublicKeyStore for MemoryKeyStore {
        async fn save(&self, account_id: &str, public_key_pem: &str) -> anyhow::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                anyhow::bail!("key store unavailable");
            }
            self.keys
                .lock()
                .await
                .insert(key_file_stem(account_id), public_key_pem.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEM_A: &str = "-----BEGIN RSA PUBLIC KEY-----\nAAAA\n-----END RSA PUBLIC KEY-----\n";
    const PEM_B: &str = "-----BEGIN RSA PUBLIC KEY-----\nBBBB\n-----END RSA PUBLIC KEY-----\n";

    fn temp_store() -> FsKeyStore {
        FsKeyStore::new(std::env::temp_dir().join(format!("tutorhub-keys-{}", Uuid::new_v4())))
    }

    #[test]
    fn stems_are_distinct_and_path_safe() {
        let stems: Vec<String> = ["t.1", "t-1", "t_1", "t1"]
            .iter()
            .map(|id| key_file_stem(id))
            .collect();
        for (i, a) in stems.iter().enumerate() {
            for b in &stems[i + 1..] {
                assert_ne!(a, b);
            }
        }

        let hostile = key_file_stem("../etc/passwd");
        assert!(!hostile.contains('/') && !hostile.contains('.'), "{hostile}");
        assert_eq!(key_file_stem("t1"), "dDE");
    }

    #[tokio::test]
    async fn save_writes_one_file_per_account() {
        let store = temp_store();
        store.save("abc-def", PEM_A).await.unwrap();

        let path = store.path_for("abc-def");
        assert!(path.ends_with(format!("{}.pem", key_file_stem("abc-def"))));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), PEM_A);
    }

    #[tokio::test]
    async fn last_write_wins_and_leaves_no_temp_files() {
        let store = temp_store();
        store.save("t1", PEM_A).await.unwrap();
        store.save("t1", PEM_B).await.unwrap();

        assert_eq!(
            tokio::fs::read_to_string(store.path_for("t1")).await.unwrap(),
            PEM_B
        );
        let mut entries = tokio::fs::read_dir(&store.dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await.unwrap() {
            names.push(e.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec![format!("{}.pem", key_file_stem("t1"))]);
    }

    #[tokio::test]
    async fn store_public_key_skips_empty_and_swallows_failures() {
        let keys = memory::MemoryKeyStore::default();
        store_public_key(&keys, "s-1", Some("")).await;
        store_public_key(&keys, "s-1", None).await;
        assert!(keys.get("s-1").await.is_none());

        keys.set_failing(true);
        store_public_key(&keys, "s-1", Some(PEM_A)).await;
        assert!(keys.get("s-1").await.is_none());

        keys.set_failing(false);
        store_public_key(&keys, "s-1", Some(PEM_A)).await;
        assert_eq!(keys.get("s-1").await.as_deref(), Some(PEM_A));
    }
}
