//! Signed-in identity.
//!
//! How an identity is obtained (login form, OAuth, ...) is up to the host.
//! The engine only reads it through [`IdentityProvider`]; [`IdentityStore`]
//! is the provider that keeps it in [`Storage`] across restarts.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::{
    Confirm, Language, Prompt, ResultEngine,
    storage::{IDENTITY_KEY, Storage, StorageError},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
}

pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Option<Identity>;
}

impl IdentityProvider for Option<Identity> {
    fn current_identity(&self) -> Option<Identity> {
        self.clone()
    }
}

pub struct IdentityStore {
    current: RwLock<Option<Identity>>,
    storage: Arc<dyn Storage>,
}

impl IdentityStore {
    /// Restores the identity saved by a previous process, if any.
    ///
    /// Unreadable or malformed values count as signed out.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let current = match storage.get(IDENTITY_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Identity>(&raw)
                .inspect_err(|err| tracing::warn!("stored identity is malformed: {err}"))
                .ok(),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!("failed to read stored identity: {err}");
                None
            }
        };
        Self {
            current: RwLock::new(current),
            storage,
        }
    }

    /// Records `identity` as signed in and persists it.
    pub fn sign_in(&self, identity: Identity) -> ResultEngine<()> {
        let payload = serde_json::to_string(&identity).map_err(StorageError::from)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
        self.storage.set(IDENTITY_KEY, &payload)?;
        Ok(())
    }

    /// Signs out if `confirm` agrees. Returns whether the identity was cleared.
    pub fn sign_out(&self, confirm: &dyn Confirm, language: Language) -> ResultEngine<bool> {
        if !confirm.confirm(Prompt::Logout, language) {
            return Ok(false);
        }
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.storage.remove(IDENTITY_KEY)?;
        tracing::info!("signed out");
        Ok(true)
    }
}

impl IdentityProvider for IdentityStore {
    fn current_identity(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ali() -> Identity {
        Identity {
            id: "u1".to_string(),
            name: "Ali".to_string(),
            email: "ali@example.com".to_string(),
        }
    }

    #[test]
    fn identity_survives_reload() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = IdentityStore::load(storage.clone());
        assert_eq!(store.current_identity(), None);
        store.sign_in(ali()).unwrap();

        let reloaded = IdentityStore::load(storage);
        assert_eq!(reloaded.current_identity(), Some(ali()));
    }

    #[test]
    fn sign_out_respects_confirmation() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = IdentityStore::load(storage.clone());
        store.sign_in(ali()).unwrap();

        let refuse = |_: Prompt, _: Language| false;
        assert!(!store.sign_out(&refuse, Language::En).unwrap());
        assert!(store.current_identity().is_some());

        let accept = |_: Prompt, _: Language| true;
        assert!(store.sign_out(&accept, Language::Ru).unwrap());
        assert_eq!(store.current_identity(), None);
        assert_eq!(storage.get(IDENTITY_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_identity_counts_as_signed_out() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(IDENTITY_KEY, "[]").unwrap();
        assert_eq!(IdentityStore::load(storage).current_identity(), None);
    }
}
