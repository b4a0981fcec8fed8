use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use watchlist_models::{ContentType, WatchCategory, WatchlistItem};

/// Row payload for inserts. Carries the locally generated id so the stored
/// row keeps it and a later reconciliation matches by id instead of
/// duplicating the item. Bookkeeping columns are left to the database.
#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    id: Uuid,
    user_id: Uuid,
    title: &'a str,
    content_type: ContentType,
    category: WatchCategory,
    notes: &'a str,
    date_added: DateTime<Utc>,
    is_watched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_video_id: Option<&'a str>,
}

/// Row payload for updates. Everything mutable plus a fresh updated_at;
/// id, owner and date_added are never touched.
#[derive(Debug, Serialize)]
struct UpdateRow<'a> {
    title: &'a str,
    content_type: ContentType,
    category: WatchCategory,
    notes: &'a str,
    is_watched: bool,
    thumbnail_url: Option<&'a str>,
    external_video_id: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

fn table_url(base_url: &str) -> String {
    format!("{}/rest/v1/watchlist_items", base_url.trim_end_matches('/'))
}

/// Fetch all rows belonging to the owner.
pub async fn list_items(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    access_token: &str,
    owner: Uuid,
) -> Result<Vec<WatchlistItem>> {
    let owner_filter = format!("eq.{}", owner);
    let response = client
        .get(table_url(base_url))
        .query(&[("select", "*"), ("user_id", owner_filter.as_str())])
        .header("apikey", anon_key)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Failed to fetch watchlist: {} - {}", status, error_text));
    }

    let items: Vec<WatchlistItem> = response.json().await?;
    debug!(count = items.len(), "fetched remote watchlist rows");
    Ok(items)
}

/// Insert one row and return the stored representation.
pub async fn insert_item(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    access_token: &str,
    item: &WatchlistItem,
    owner: Uuid,
) -> Result<WatchlistItem> {
    let row = InsertRow {
        id: item.id,
        user_id: owner,
        title: &item.title,
        content_type: item.content_type,
        category: item.category,
        notes: &item.notes,
        date_added: item.date_added,
        is_watched: item.is_watched,
        thumbnail_url: item.thumbnail_url.as_deref(),
        external_video_id: item.external_video_id.as_deref(),
    };

    let response = client
        .post(table_url(base_url))
        .json(&row)
        .header("apikey", anon_key)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("Content-Type", "application/json")
        .header("Prefer", "return=representation")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Failed to insert item: {} - {}", status, error_text));
    }

    // return=representation always yields an array, even for one row
    let mut stored: Vec<WatchlistItem> = response.json().await?;
    stored
        .pop()
        .ok_or_else(|| anyhow!("Insert returned no representation"))
}

/// Patch the row matching the item's id.
pub async fn update_item(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    access_token: &str,
    item: &WatchlistItem,
) -> Result<()> {
    let row = UpdateRow {
        title: &item.title,
        content_type: item.content_type,
        category: item.category,
        notes: &item.notes,
        is_watched: item.is_watched,
        thumbnail_url: item.thumbnail_url.as_deref(),
        external_video_id: item.external_video_id.as_deref(),
        updated_at: Utc::now(),
    };

    let response = client
        .patch(table_url(base_url))
        .query(&[("id", format!("eq.{}", item.id))])
        .json(&row)
        .header("apikey", anon_key)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Failed to update item: {} - {}", status, error_text));
    }

    Ok(())
}

/// Delete the row matching the id.
pub async fn delete_item(
    client: &Client,
    base_url: &str,
    anon_key: &str,
    access_token: &str,
    id: Uuid,
) -> Result<()> {
    let response = client
        .delete(table_url(base_url))
        .query(&[("id", format!("eq.{}", id))])
        .header("apikey", anon_key)
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Failed to delete item: {} - {}", status, error_text));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_row_carries_local_id_and_skips_bookkeeping() {
        let item = WatchlistItem::new(
            "Severance".to_string(),
            ContentType::Movie,
            WatchCategory::Long,
            String::new(),
        );
        let owner = Uuid::new_v4();
        let row = InsertRow {
            id: item.id,
            user_id: owner,
            title: &item.title,
            content_type: item.content_type,
            category: item.category,
            notes: &item.notes,
            date_added: item.date_added,
            is_watched: item.is_watched,
            thumbnail_url: item.thumbnail_url.as_deref(),
            external_video_id: item.external_video_id.as_deref(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], item.id.to_string());
        assert_eq!(json["user_id"], owner.to_string());
        assert_eq!(json["content_type"], "movie");
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_none());
        assert!(json.get("thumbnail_url").is_none());
    }

    #[test]
    fn table_url_tolerates_trailing_slash() {
        assert_eq!(
            table_url("https://proj.supabase.co/"),
            "https://proj.supabase.co/rest/v1/watchlist_items"
        );
    }
}
