use async_trait::async_trait;
use uuid::Uuid;
use watchlist_models::{Mood, MoodSignal, WatchlistItem};

use crate::error::RemoteError;

/// The remote table holding an account's watchlist rows.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Fetch every item belonging to the owner. The result is authoritative
    /// during reconciliation.
    async fn list_items(&self, owner: Uuid) -> Result<Vec<WatchlistItem>, RemoteError>;

    /// Insert an item and return the stored row. The item's locally
    /// generated id goes along so the remote row keeps it.
    async fn insert_item(
        &self,
        item: &WatchlistItem,
        owner: Uuid,
    ) -> Result<WatchlistItem, RemoteError>;

    async fn update_item(&self, item: &WatchlistItem) -> Result<(), RemoteError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), RemoteError>;
}

/// Who, if anyone, is signed in right now.
pub trait SessionProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn owner_id(&self) -> Option<Uuid>;
}

/// Title/thumbnail lookup for externally hosted videos.
///
/// Infallible by contract: a failed lookup returns empty strings and the
/// caller falls back to whatever the user typed.
#[async_trait]
pub trait VideoMetadataProvider: Send + Sync {
    async fn fetch(&self, video_id: &str) -> (String, String);
}

/// Title analysis for mood matching.
///
/// Infallible by contract: failures come back as `MoodSignal::none()` so
/// recommendations never depend on the service being up.
#[async_trait]
pub trait TitleMoodRater: Send + Sync {
    async fn rate(&self, title: &str, mood: Mood) -> MoodSignal;
}

/// Rater used when no analysis service is configured.
pub struct NullRater;

#[async_trait]
impl TitleMoodRater for NullRater {
    async fn rate(&self, _title: &str, _mood: Mood) -> MoodSignal {
        MoodSignal::none()
    }
}
