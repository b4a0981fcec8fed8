use crate::error::RemoteError;
use crate::supabase::api;
use crate::supabase::auth::{self, AuthSession};
use crate::traits::RemoteRepository;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use watchlist_models::WatchlistItem;

/// REST client for the Supabase project backing the watchlist.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Arc<Client>,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url,
            anon_key,
            access_token: None,
        }
    }

    /// Resume a previously saved session.
    pub fn with_access_token(mut self, access_token: String) -> Self {
        self.access_token = Some(access_token);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not authenticated"))
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthSession> {
        let session =
            auth::sign_in(&self.client, &self.base_url, &self.anon_key, email, password).await?;
        self.access_token = Some(session.access_token.clone());
        info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<Option<AuthSession>> {
        let session =
            auth::sign_up(&self.client, &self.base_url, &self.anon_key, email, password).await?;
        if let Some(ref s) = session {
            self.access_token = Some(s.access_token.clone());
            info!(user_id = %s.user_id, "signed up");
        }
        Ok(session)
    }
}

#[async_trait]
impl RemoteRepository for SupabaseClient {
    async fn list_items(&self, owner: Uuid) -> Result<Vec<WatchlistItem>, RemoteError> {
        let access_token = self
            .access_token()
            .map_err(|e| RemoteError::new(format!("{}", e)))?;
        api::list_items(&self.client, &self.base_url, &self.anon_key, access_token, owner)
            .await
            .map_err(|e| RemoteError::new(format!("{}", e)))
    }

    async fn insert_item(
        &self,
        item: &WatchlistItem,
        owner: Uuid,
    ) -> Result<WatchlistItem, RemoteError> {
        let access_token = self
            .access_token()
            .map_err(|e| RemoteError::new(format!("{}", e)))?;
        api::insert_item(&self.client, &self.base_url, &self.anon_key, access_token, item, owner)
            .await
            .map_err(|e| RemoteError::new(format!("{}", e)))
    }

    async fn update_item(&self, item: &WatchlistItem) -> Result<(), RemoteError> {
        let access_token = self
            .access_token()
            .map_err(|e| RemoteError::new(format!("{}", e)))?;
        api::update_item(&self.client, &self.base_url, &self.anon_key, access_token, item)
            .await
            .map_err(|e| RemoteError::new(format!("{}", e)))
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RemoteError> {
        let access_token = self
            .access_token()
            .map_err(|e| RemoteError::new(format!("{}", e)))?;
        api::delete_item(&self.client, &self.base_url, &self.anon_key, access_token, id)
            .await
            .map_err(|e| RemoteError::new(format!("{}", e)))
    }
}
