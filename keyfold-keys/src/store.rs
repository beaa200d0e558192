//! Persistence contract for key envelopes and member public keys.
//!
//! The real store lives outside this core (the service's database). The
//! contract it must honor is small but load-bearing: `create_envelope` is
//! the single atomic commit point of envelope creation and must enforce
//! uniqueness on `project_id`, reporting [`StoreError::Duplicate`] when an
//! envelope already exists. That constraint, not an in-process lock, is
//! what resolves concurrent creation races across service instances.

use keyfold_crypto::SealedKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a key store can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An envelope already exists for this project (uniqueness violation).
    #[error("envelope already exists for project")]
    Duplicate,

    /// Backend failure (connectivity, corruption, query error).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The persisted record of a project's sealed shared key.
///
/// Keyed by `project_id` alone: one canonical envelope per project. Its
/// presence is what "the project has been initialized" means.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyEnvelope {
    /// Store-assigned record id.
    pub id: String,
    /// The project this envelope belongs to.
    pub project_id: String,
    /// The project key sealed under the initial recipient's public key.
    pub sealed_key: SealedKey,
    /// Unix timestamp when the envelope was persisted.
    pub created_at: i64,
}

/// Abstract persistence for envelopes and enrolled public keys.
pub trait KeyStore: Send + Sync {
    /// Looks up the canonical envelope for a project.
    fn find_envelope(&self, project_id: &str) -> StoreResult<Option<KeyEnvelope>>;

    /// Persists a new envelope, enforcing uniqueness on `project_id`.
    ///
    /// Returns [`StoreError::Duplicate`] when an envelope already exists;
    /// callers treat that as having lost a creation race, not as a failure.
    fn create_envelope(&self, project_id: &str, sealed_key: SealedKey) -> StoreResult<KeyEnvelope>;

    /// Looks up a member's enrolled public key, if any.
    ///
    /// The bytes are opaque to the store; the manager validates the format.
    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<Vec<u8>>>;
}

/// In-memory [`KeyStore`] with the uniqueness guarantee.
///
/// Reference implementation for tests and embedders without a database.
#[derive(Default)]
pub struct MemoryKeyStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    envelopes: HashMap<String, KeyEnvelope>,
    public_keys: HashMap<String, Vec<u8>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrolls a member's public key (done by the identity subsystem in
    /// production).
    pub fn register_public_key(&self, user_id: &str, public_key: impl Into<Vec<u8>>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.public_keys.insert(user_id.to_string(), public_key.into());
        }
    }

    /// Number of persisted envelopes.
    pub fn envelope_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.envelopes.len()).unwrap_or(0)
    }
}

impl KeyStore for MemoryKeyStore {
    fn find_envelope(&self, project_id: &str) -> StoreResult<Option<KeyEnvelope>> {
        let inner = lock(&self.inner)?;
        Ok(inner.envelopes.get(project_id).cloned())
    }

    fn create_envelope(&self, project_id: &str, sealed_key: SealedKey) -> StoreResult<KeyEnvelope> {
        let mut inner = lock(&self.inner)?;
        if inner.envelopes.contains_key(project_id) {
            return Err(StoreError::Duplicate);
        }

        let envelope = KeyEnvelope {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            sealed_key,
            created_at: chrono::Utc::now().timestamp(),
        };
        inner.envelopes.insert(project_id.to_string(), envelope.clone());
        Ok(envelope)
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<Vec<u8>>> {
        let inner = lock(&self.inner)?;
        Ok(inner.public_keys.get(user_id).cloned())
    }
}

fn lock(mutex: &Mutex<MemoryInner>) -> StoreResult<std::sync::MutexGuard<'_, MemoryInner>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
}
