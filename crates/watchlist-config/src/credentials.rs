use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat key/value secret store persisted as TOML next to the config file.
/// Holds the remote session (tokens, account id) between CLI invocations.
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    // Session accessors

    pub fn get_access_token(&self) -> Option<&String> {
        self.get("supabase_access_token")
    }

    pub fn set_access_token(&mut self, token: String) {
        self.set("supabase_access_token".to_string(), token);
    }

    pub fn get_refresh_token(&self) -> Option<&String> {
        self.get("supabase_refresh_token")
    }

    pub fn set_refresh_token(&mut self, token: String) {
        self.set("supabase_refresh_token".to_string(), token);
    }

    pub fn get_owner_id(&self) -> Option<Uuid> {
        self.get("supabase_owner_id")
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn set_owner_id(&mut self, id: Uuid) {
        self.set("supabase_owner_id".to_string(), id.to_string());
    }

    pub fn get_email(&self) -> Option<&String> {
        self.get("supabase_email")
    }

    pub fn set_email(&mut self, email: String) {
        self.set("supabase_email".to_string(), email);
    }

    pub fn get_token_expires(&self) -> Option<DateTime<Utc>> {
        self.get("supabase_token_expires")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn set_token_expires(&mut self, expires: DateTime<Utc>) {
        self.set("supabase_token_expires".to_string(), expires.to_rfc3339());
    }

    /// A session is present when both the token and the account id are.
    pub fn has_session(&self) -> bool {
        self.get_access_token().is_some() && self.get_owner_id().is_some()
    }

    pub fn clear_session(&mut self) {
        self.remove("supabase_access_token");
        self.remove("supabase_refresh_token");
        self.remove("supabase_owner_id");
        self.remove("supabase_email");
        self.remove("supabase_token_expires");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_access_token("token-abc".to_string());
        store.set_email("user@example.com".to_string());
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_access_token(), Some(&"token-abc".to_string()));
        assert_eq!(loaded_store.get_email(), Some(&"user@example.com".to_string()));
    }

    #[test]
    fn test_owner_id_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        let owner = Uuid::new_v4();

        let mut store = CredentialStore::new(path.clone());
        store.set_owner_id(owner);
        store.set_access_token("t".to_string());
        store.save().unwrap();

        let mut loaded = CredentialStore::new(path);
        loaded.load().unwrap();
        assert_eq!(loaded.get_owner_id(), Some(owner));
        assert!(loaded.has_session());
    }

    #[test]
    fn test_token_expires_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        let expires = Utc::now() + chrono::Duration::hours(1);
        store.set_token_expires(expires);
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        let loaded_expires = loaded_store.get_token_expires().unwrap();
        // Allow 1 second difference for serialization
        assert!((loaded_expires - expires).num_seconds().abs() < 2);
    }

    #[test]
    fn test_clear_session() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set_access_token("t".to_string());
        store.set_owner_id(Uuid::new_v4());
        store.set("unrelated".to_string(), "kept".to_string());

        store.clear_session();
        assert!(!store.has_session());
        assert_eq!(store.get("unrelated"), Some(&"kept".to_string()));
    }
}
