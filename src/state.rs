use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::{
        identity::IdentityVerifier,
        keys::{FsKeyStore, PublicKeyStore},
        password::CredentialHasher,
    },
    chats::repo::{ChatRepo, PgChatRepo},
    config::AppConfig,
    lessons::repo::{LessonRepo, PgLessonRepo},
    registrations::repo::{PgRegistrationRepo, RegistrationRepo},
    students::repo::{PgStudentRepo, StudentRepo},
    teachers::repo::{PgTeacherRepo, TeacherRepo},
};

/// Everything a handler may touch. Cloned per request; all fields are shared handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub students: Arc<dyn StudentRepo>,
    pub teachers: Arc<dyn TeacherRepo>,
    pub lessons: Arc<dyn LessonRepo>,
    pub chats: Arc<dyn ChatRepo>,
    pub registrations: Arc<dyn RegistrationRepo>,
    pub keys: Arc<dyn PublicKeyStore>,
    pub hasher: CredentialHasher,
    pub identity: Option<Arc<IdentityVerifier>>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new(&config.password)?;
        let identity = match &config.identity {
            Some(cfg) => Some(Arc::new(IdentityVerifier::from_config(cfg)?)),
            None => {
                tracing::info!("external login disabled: no identity provider key configured");
                None
            }
        };
        let keys = Arc::new(FsKeyStore::new(&config.keys_dir)) as Arc<dyn PublicKeyStore>;

        Ok(Self {
            students: Arc::new(PgStudentRepo::new(db.clone())),
            teachers: Arc::new(PgTeacherRepo::new(db.clone())),
            lessons: Arc::new(PgLessonRepo::new(db.clone())),
            chats: Arc::new(PgChatRepo::new(db.clone())),
            registrations: Arc::new(PgRegistrationRepo::new(db)),
            keys,
            hasher,
            identity,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory repositories, cheap hashing, no identity provider.
    pub fn fake() -> Self {
        Self::fake_with_keys().0
    }

    /// Like [`AppState::fake`], also handing back the key store for inspection.
    pub fn fake_with_keys() -> (Self, Arc<crate::auth::keys::memory::MemoryKeyStore>) {
        use crate::{
            chats::repo::memory::MemoryChatRepo, lessons::repo::memory::MemoryLessonRepo,
            registrations::repo::memory::MemoryRegistrationRepo,
            students::repo::memory::MemoryStudentRepo, teachers::repo::memory::MemoryTeacherRepo,
        };

        let config = AppConfig::for_tests();
        let keys = Arc::new(crate::auth::keys::memory::MemoryKeyStore::default());
        let state = Self {
            students: Arc::new(MemoryStudentRepo::default()),
            teachers: Arc::new(MemoryTeacherRepo::default()),
            lessons: Arc::new(MemoryLessonRepo::default()),
            chats: Arc::new(MemoryChatRepo::default()),
            registrations: Arc::new(MemoryRegistrationRepo::default()),
            keys: keys.clone(),
            hasher: CredentialHasher::new(&config.password).expect("test argon2 params"),
            identity: None,
            config: Arc::new(config),
        };
        (state, keys)
    }

    /// Fake state whose identity verifier accepts tokens minted by
    /// `auth::identity::testing::mint`.
    pub fn fake_with_identity() -> Self {
        let verifier = IdentityVerifier::from_config(&crate::auth::identity::testing::config())
            .expect("test identity config");
        Self {
            identity: Some(Arc::new(verifier)),
            ..Self::fake()
        }
    }
}
