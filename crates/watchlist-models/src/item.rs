use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single saved entry in the watchlist.
///
/// The same shape is written to the local store file and exchanged with the
/// remote `watchlist_items` table, so the serde names follow the table's
/// snake_case columns. Optional fields are omitted when absent rather than
/// serialized as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    /// Generated locally at creation and never reassigned, even when the
    /// item is later inserted remotely.
    pub id: Uuid,
    /// Owning remote account. `None` for items that only exist locally.
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub content_type: ContentType,
    pub category: WatchCategory,
    pub notes: String,
    /// Set once at creation. Immutable afterwards, including across sync.
    pub date_added: DateTime<Utc>,
    pub is_watched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WatchlistItem {
    /// Create a local-only item. An owner is attached later, after a
    /// successful remote insert.
    pub fn new(
        title: String,
        content_type: ContentType,
        category: WatchCategory,
        notes: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: None,
            title,
            content_type,
            category,
            notes,
            date_added: now,
            is_watched: false,
            thumbnail_url: None,
            external_video_id: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Attach video metadata captured at add time.
    pub fn with_video(mut self, external_video_id: String, thumbnail_url: Option<String>) -> Self {
        self.external_video_id = Some(external_video_id);
        self.thumbnail_url = thumbnail_url;
        self
    }

    pub fn is_local_only(&self) -> bool {
        self.owner_id.is_none()
    }

    /// Whole days the item has been sitting in the list.
    pub fn days_in_list(&self, now: DateTime<Utc>) -> i64 {
        (now - self.date_added).num_days()
    }
}

/// Kind of content the item points at. Wire names are stable lowercase
/// strings shared by the store file and the remote table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Movies and series.
    Movie,
    /// Standalone videos (screencasts, talks, clips).
    Video,
    Podcast,
}

impl ContentType {
    pub const ALL: [ContentType; 3] =
        [ContentType::Movie, ContentType::Video, ContentType::Podcast];

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie/Series",
            ContentType::Video => "Video",
            ContentType::Podcast => "Podcast",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Rough time commitment, the axis most of the recommendation heuristics
/// work on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WatchCategory {
    /// Under 30 minutes.
    Quick,
    /// 30 minutes or more.
    Long,
}

impl WatchCategory {
    pub const ALL: [WatchCategory; 2] = [WatchCategory::Quick, WatchCategory::Long];

    pub fn label(&self) -> &'static str {
        match self {
            WatchCategory::Quick => "Quick Watch",
            WatchCategory::Long => "Binge Ready",
        }
    }

    pub fn duration_hint(&self) -> &'static str {
        match self {
            WatchCategory::Quick => "Under 30 minutes",
            WatchCategory::Long => "30+ minutes",
        }
    }
}

impl std::fmt::Display for WatchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_table_columns() {
        let item = WatchlistItem::new(
            "Blade Runner".to_string(),
            ContentType::Movie,
            WatchCategory::Long,
            String::new(),
        );
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["content_type"], "movie");
        assert_eq!(json["category"], "long");
        assert_eq!(json["is_watched"], false);
        // Absent optionals are omitted, not null or empty strings
        assert!(json.get("user_id").is_none());
        assert!(json.get("thumbnail_url").is_none());
        assert!(json.get("external_video_id").is_none());
    }

    #[test]
    fn remote_row_round_trips() {
        let row = serde_json::json!({
            "id": "7f1aebc0-4f05-4a6e-9db0-7f19c5a3f0f1",
            "user_id": "0a0f9db4-2b0f-45f7-8a2f-3a4f5b6c7d8e",
            "title": "Sharp Objects",
            "content_type": "movie",
            "category": "long",
            "notes": "from Dana",
            "date_added": "2025-06-01T18:30:00Z",
            "is_watched": true,
            "created_at": "2025-06-01T18:30:05Z",
            "updated_at": "2025-06-02T09:00:00Z"
        });
        let item: WatchlistItem = serde_json::from_value(row).unwrap();

        assert!(!item.is_local_only());
        assert_eq!(item.content_type, ContentType::Movie);
        assert_eq!(item.notes, "from Dana");
        assert!(item.thumbnail_url.is_none());
    }

    #[test]
    fn days_in_list_counts_whole_days() {
        let mut item = WatchlistItem::new(
            "a".to_string(),
            ContentType::Video,
            WatchCategory::Quick,
            String::new(),
        );
        item.date_added = Utc::now() - chrono::Duration::hours(25);
        assert_eq!(item.days_in_list(Utc::now()), 1);
    }
}
