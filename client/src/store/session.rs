//! Auth session: bearer token plus the signed-in user, mirrored to durable
//! storage under [`keys::TOKEN`] and [`keys::USER`].

use super::storage::{keys, load_json, save_json, Storage};
use crate::core::error::Result;
use parking_lot::RwLock;
use shared::dto::auth::UserInfo;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

impl Session {
    /// Token and user both present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Owner of the [`Session`]. The HTTP adapter reads the token from here and
/// clears it on any 401.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            storage,
        }
    }

    /// Restore whatever was persisted. Returns the restored session.
    pub fn restore(&self) -> Session {
        let token = match self.storage.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token");
                None
            }
        };
        let user = load_json::<UserInfo>(self.storage.as_ref(), keys::USER);

        let session = Session { token, user };
        tracing::debug!(
            has_token = session.token.is_some(),
            has_user = session.user.is_some(),
            "Session restored"
        );
        *self.state.write() = session.clone();
        session
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Install a new session in memory and storage.
    pub fn set(&self, token: String, user: UserInfo) -> Result<()> {
        self.storage.set(keys::TOKEN, &token)?;
        save_json(self.storage.as_ref(), keys::USER, &user)?;
        *self.state.write() = Session {
            token: Some(token),
            user: Some(user),
        };
        Ok(())
    }

    /// Replace the stored user, keeping the token.
    pub fn set_user(&self, user: UserInfo) -> Result<()> {
        save_json(self.storage.as_ref(), keys::USER, &user)?;
        self.state.write().user = Some(user);
        Ok(())
    }

    /// Destroy the session. Memory is cleared even if storage fails.
    pub fn clear(&self) {
        *self.state.write() = Session::default();
        for key in [keys::TOKEN, keys::USER] {
            if let Err(e) = self.storage.remove(key) {
                tracing::error!(key = %key, error = %e, "Failed to remove persisted session key");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::storage::MemoryStorage;

    fn user() -> UserInfo {
        UserInfo {
            id: 7,
            email: "ana@biuai.com".to_string(),
            nome: Some("Ana".to_string()),
            is_admin: false,
            created_at: None,
        }
    }

    #[test]
    fn test_set_persists_and_restore_reads_back() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.set("tok".to_string(), user()).unwrap();
        assert!(store.is_authenticated());

        let fresh = SessionStore::new(storage);
        assert!(!fresh.is_authenticated());
        let restored = fresh.restore();
        assert_eq!(restored.token.as_deref(), Some("tok"));
        assert_eq!(restored.user, Some(user()));
    }

    #[test]
    fn test_clear_removes_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.set("tok".to_string(), user()).unwrap();
        store.clear();

        assert_eq!(store.snapshot(), Session::default());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_token_without_user_is_not_authenticated() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "tok").unwrap();
        let store = SessionStore::new(storage);
        let session = store.restore();
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert!(!session.is_authenticated());
    }
}
