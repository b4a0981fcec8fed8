use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use watchlist_config::{CredentialStore, PathManager};

use crate::traits::SessionProvider;

/// Session restored from the credential store at startup.
///
/// An expired token counts as signed out, so pushes stop cleanly instead of
/// failing with 401s on every call.
pub struct SavedSession {
    owner_id: Option<Uuid>,
    access_token: Option<String>,
}

impl SavedSession {
    pub fn load(paths: &PathManager) -> Self {
        let mut store = CredentialStore::new(paths.credentials_file());
        if store.load().is_err() {
            return Self::signed_out();
        }
        Self::from_store(&store)
    }

    pub fn from_store(store: &CredentialStore) -> Self {
        if let Some(expires) = store.get_token_expires() {
            if expires <= Utc::now() {
                debug!("saved session expired, treating as signed out");
                return Self::signed_out();
            }
        }

        Self {
            owner_id: store.get_owner_id(),
            access_token: store.get_access_token().cloned(),
        }
    }

    fn signed_out() -> Self {
        Self {
            owner_id: None,
            access_token: None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl SessionProvider for SavedSession {
    fn is_authenticated(&self) -> bool {
        self.owner_id.is_some() && self.access_token.is_some()
    }

    fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }
}
