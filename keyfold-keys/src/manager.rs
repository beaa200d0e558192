//! Project key envelope orchestration.
//!
//! Guarantees that every project missing its shared-key envelope gets
//! exactly one created, sealed for the requesting member, and persisted
//! exactly once. Generation and sealing happen entirely in memory; the
//! store's `create_envelope` is the single commit point, so an aborted call
//! leaves no partial record.

use crate::error::{KeysError, KeysResult};
use crate::store::{KeyStore, StoreError};
use keyfold_crypto::{envelope, ProjectKey, PROJECT_KEY_SIZE};
use std::sync::Arc;
use tracing::debug;

/// Outcome of an ensure-envelope call.
#[derive(Clone, Debug)]
pub enum EnsureOutcome {
    /// A fresh envelope was generated, sealed, and persisted.
    Created(crate::store::KeyEnvelope),
    /// The project already had its envelope; nothing was written.
    AlreadyPresent(crate::store::KeyEnvelope),
    /// The member has not enrolled a public key yet; creation is deferred.
    NoRecipientKey,
}

/// Ensures each project has exactly one sealed shared-key envelope.
pub struct EnvelopeKeyManager {
    store: Arc<dyn KeyStore>,
    project_key_len: usize,
}

impl EnvelopeKeyManager {
    /// Creates a manager generating default-length (32-byte) project keys.
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self::with_key_length(store, PROJECT_KEY_SIZE)
    }

    /// Creates a manager with a configured project key length.
    pub fn with_key_length(store: Arc<dyn KeyStore>, project_key_len: usize) -> Self {
        Self {
            store,
            project_key_len,
        }
    }

    /// Ensures `project_id` has a shared-key envelope, sealing a fresh key
    /// for `user_id` if none exists.
    ///
    /// Idempotent: an existing envelope short-circuits to
    /// [`EnsureOutcome::AlreadyPresent`]. A member without an enrolled
    /// public key defers creation ([`EnsureOutcome::NoRecipientKey`]) rather
    /// than failing. Losing a concurrent creation race is recovered by
    /// re-reading the winner's envelope, never surfaced as an error.
    ///
    /// A malformed enrolled key fails with [`keyfold_crypto::CryptoError::KeyFormat`]
    /// before anything is persisted.
    pub fn ensure_envelope(&self, project_id: &str, user_id: &str) -> KeysResult<EnsureOutcome> {
        if let Some(existing) = self.store.find_envelope(project_id).map_err(store_err)? {
            return Ok(EnsureOutcome::AlreadyPresent(existing));
        }

        let Some(public_key_bytes) = self.store.find_public_key(user_id).map_err(store_err)?
        else {
            debug!("no enrolled public key for user, deferring envelope for {project_id}");
            return Ok(EnsureOutcome::NoRecipientKey);
        };
        let recipient = envelope::recipient_from_bytes(&public_key_bytes)?;

        // Plaintext project key lives only within this scope; it is sealed
        // before the store commit and zeroized when dropped.
        let project_key = ProjectKey::generate(self.project_key_len)?;
        let sealed = envelope::seal_key(project_key.as_bytes(), &recipient)?;
        drop(project_key);

        match self.store.create_envelope(project_id, sealed) {
            Ok(created) => {
                debug!("created shared-key envelope for project {project_id}");
                Ok(EnsureOutcome::Created(created))
            }
            Err(StoreError::Duplicate) => {
                // Lost the race: another request committed first. Their
                // envelope is the canonical one.
                debug!("lost envelope creation race for project {project_id}, re-reading");
                let winner = self
                    .store
                    .find_envelope(project_id)
                    .map_err(store_err)?
                    .ok_or_else(|| {
                        KeysError::Store(
                            "store reported duplicate envelope but none found on re-read"
                                .to_string(),
                        )
                    })?;
                Ok(EnsureOutcome::AlreadyPresent(winner))
            }
            Err(e @ StoreError::Backend(_)) => Err(store_err(e)),
        }
    }
}

fn store_err(e: StoreError) -> KeysError {
    KeysError::Store(e.to_string())
}
