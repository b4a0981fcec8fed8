use crate::error::StoreError;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;
use watchlist_models::WatchlistItem;

/// Local-first watchlist store: a vector in memory, a JSON file on disk.
///
/// Every mutation rewrites the file before returning. Persistence failures
/// are logged and swallowed so a bad disk never blocks the in-memory list,
/// and the temp-then-rename write keeps the previous file intact when a
/// write dies halfway.
pub struct WatchlistStore {
    path: PathBuf,
    items: Vec<WatchlistItem>,
}

impl WatchlistStore {
    /// Open the store at `path`, starting empty when the file is missing
    /// or unreadable.
    pub fn open(path: PathBuf) -> Self {
        let items = load_items(&path);
        Self { path, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    /// Owned copy of the current list, for callers that filter or sort
    /// without holding the store lock.
    pub fn snapshot(&self) -> Vec<WatchlistItem> {
        self.items.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<&WatchlistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append a new item. Rejects whitespace-only titles without touching
    /// the list.
    pub fn add(&mut self, item: WatchlistItem) -> Result<WatchlistItem, StoreError> {
        if item.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        self.items.push(item.clone());
        self.persist();
        Ok(item)
    }

    /// Flip the watched flag. Unknown ids are a no-op (`None`).
    pub fn toggle_watched(&mut self, id: Uuid) -> Option<WatchlistItem> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.is_watched = !item.is_watched;
        item.updated_at = Some(Utc::now());
        let updated = item.clone();
        self.persist();
        Some(updated)
    }

    /// Remove an item, returning it so the caller can propagate the delete.
    /// Unknown ids are a no-op (`None`).
    pub fn delete(&mut self, id: Uuid) -> Option<WatchlistItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(index);
        self.persist();
        Some(removed)
    }

    /// Mark every listed id as watched (sets the flag, never toggles).
    /// One file write for the whole batch; returns the affected items.
    pub fn mark_watched(&mut self, ids: &[Uuid]) -> Vec<WatchlistItem> {
        let mut affected = Vec::new();
        for item in self.items.iter_mut().filter(|item| ids.contains(&item.id)) {
            item.is_watched = true;
            item.updated_at = Some(Utc::now());
            affected.push(item.clone());
        }
        if !affected.is_empty() {
            self.persist();
        }
        affected
    }

    /// Remove every listed id. One file write for the whole batch; returns
    /// the removed items.
    pub fn delete_many(&mut self, ids: &[Uuid]) -> Vec<WatchlistItem> {
        let removed: Vec<WatchlistItem> = self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect();
        if removed.is_empty() {
            return removed;
        }
        self.items.retain(|item| !ids.contains(&item.id));
        self.persist();
        removed
    }

    /// Replace the list with the remote set, keeping items the remote has
    /// never seen. Returns those local-only leftovers so the caller can
    /// push them. One file write for the whole swap.
    pub fn apply_remote(&mut self, remote_items: Vec<WatchlistItem>) -> Vec<WatchlistItem> {
        let local_only: Vec<WatchlistItem> = self
            .items
            .iter()
            .filter(|item| {
                item.is_local_only() && !remote_items.iter().any(|remote| remote.id == item.id)
            })
            .cloned()
            .collect();

        debug!(
            "Applying remote state: {} remote items, {} local-only preserved",
            remote_items.len(),
            local_only.len()
        );

        self.items = remote_items;
        self.items.extend(local_only.iter().cloned());
        self.persist();
        local_only
    }

    /// Attach the owner and server bookkeeping returned by a successful
    /// insert. The id never changes; watched state and text stay local so
    /// edits made while the insert was in flight survive.
    pub fn promote(&mut self, remote: &WatchlistItem) -> Option<WatchlistItem> {
        let item = self.items.iter_mut().find(|item| item.id == remote.id)?;
        item.owner_id = remote.owner_id;
        item.created_at = remote.created_at.or(item.created_at);
        item.updated_at = remote.updated_at.or(item.updated_at);
        let promoted = item.clone();
        self.persist();
        Some(promoted)
    }

    fn persist(&self) {
        if let Err(e) = self.write_to_disk() {
            warn!("Failed to persist watchlist to {:?}: {}", self.path, e);
        }
    }

    fn write_to_disk(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.items)?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!("Persisted {} items to {:?}", self.items.len(), self.path);
        Ok(())
    }
}

fn load_items(path: &Path) -> Vec<WatchlistItem> {
    if !path.exists() {
        debug!("No watchlist file at {:?}, starting empty", path);
        return Vec::new();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Vec<WatchlistItem>>(&content) {
            Ok(items) => {
                info!("Loaded watchlist: {} items from {:?}", items.len(), path);
                items
            }
            Err(e) => {
                warn!(
                    "Watchlist file at {:?} is corrupt ({}), starting empty",
                    path, e
                );
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Failed to read watchlist file at {:?}: {}", path, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;
    use watchlist_models::{ContentType, WatchCategory};

    fn create_item(title: &str) -> WatchlistItem {
        WatchlistItem::new(
            title.to_string(),
            ContentType::Video,
            WatchCategory::Quick,
            String::new(),
        )
    }

    fn create_owned_item(title: &str) -> WatchlistItem {
        let mut item = create_item(title);
        item.owner_id = Some(Uuid::new_v4());
        item
    }

    fn store_in(dir: &TempDir) -> WatchlistStore {
        WatchlistStore::open(dir.path().join("watchlist.json"))
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.json");
        std::fs::write(&path, "{ not json at all").unwrap();

        let store = WatchlistStore::open(path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.json");

        let mut store = WatchlistStore::open(path.clone());
        let added = store.add(create_item("Blade Runner")).unwrap();
        store.add(create_item("Hard Fork")).unwrap();
        store.toggle_watched(added.id).unwrap();
        assert_eq!(store.len(), 2);

        let reloaded = WatchlistStore::open(path);
        assert_eq!(reloaded.len(), 2);
        let found = reloaded.get(added.id).unwrap();
        assert_eq!(found.title, "Blade Runner");
        assert!(found.is_watched);
        // The toggle refreshed updated_at but never date_added
        assert_eq!(found.date_added, added.date_added);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(
            store.add(create_item("")),
            Err(StoreError::EmptyTitle)
        );
        assert_eq!(
            store.add(create_item("   ")),
            Err(StoreError::EmptyTitle)
        );
        assert!(store.is_empty());
        assert!(!dir.path().join("watchlist.json").exists());
    }

    #[test]
    fn test_toggle_watched_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let item = store.add(create_item("Severance")).unwrap();

        let toggled = store.toggle_watched(item.id).unwrap();
        assert!(toggled.is_watched);
        assert_eq!(toggled.date_added, item.date_added);

        let back = store.toggle_watched(item.id).unwrap();
        assert!(!back.is_watched);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add(create_item("Severance")).unwrap();

        assert!(store.toggle_watched(Uuid::new_v4()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_returns_removed_item() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let item = store.add(create_item("Andor")).unwrap();

        let removed = store.delete(item.id).unwrap();
        assert_eq!(removed.id, item.id);
        assert!(store.is_empty());
        assert!(store.delete(item.id).is_none());
    }

    #[test]
    fn test_mark_watched_batch() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let a = store.add(create_item("A")).unwrap();
        let b = store.add(create_item("B")).unwrap();
        store.add(create_item("C")).unwrap();

        let affected = store.mark_watched(&[a.id, b.id, Uuid::new_v4()]);
        assert_eq!(affected.len(), 2);
        assert!(affected.iter().all(|item| item.is_watched));

        // Already-watched items are set again, not toggled back
        let again = store.mark_watched(&[a.id]);
        assert!(again[0].is_watched);
    }

    #[test]
    fn test_delete_many() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let a = store.add(create_item("A")).unwrap();
        store.add(create_item("B")).unwrap();
        let c = store.add(create_item("C")).unwrap();

        let removed = store.delete_many(&[a.id, c.id]);
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "B");
    }

    #[test]
    fn test_apply_remote_preserves_local_only() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let local = store.add(create_item("Local draft")).unwrap();
        let owned = store.add(create_owned_item("Synced earlier")).unwrap();

        let mut remote_version = owned.clone();
        remote_version.title = "Synced earlier (renamed)".to_string();
        let other_remote = create_owned_item("From another device");

        let preserved =
            store.apply_remote(vec![remote_version.clone(), other_remote.clone()]);

        assert_eq!(preserved.len(), 1);
        assert_eq!(preserved[0].id, local.id);
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(owned.id).unwrap().title,
            "Synced earlier (renamed)"
        );
        assert!(store.get(other_remote.id).is_some());
        assert!(store.get(local.id).is_some());
    }

    #[test]
    fn test_apply_remote_drops_remotely_deleted_items() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let owned = store.add(create_owned_item("Deleted elsewhere")).unwrap();

        let preserved = store.apply_remote(Vec::new());
        assert!(preserved.is_empty());
        assert!(store.get(owned.id).is_none());
    }

    #[test]
    fn test_promote_keeps_local_edits() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let item = store.add(create_item("In flight")).unwrap();
        store.toggle_watched(item.id).unwrap();

        let mut remote = item.clone();
        remote.owner_id = Some(Uuid::new_v4());
        remote.is_watched = false;
        remote.created_at = Some(Utc::now() + Duration::seconds(5));

        let promoted = store.promote(&remote).unwrap();
        assert_eq!(promoted.id, item.id);
        assert_eq!(promoted.owner_id, remote.owner_id);
        assert_eq!(promoted.created_at, remote.created_at);
        // The toggle that happened while the insert was in flight wins
        assert!(promoted.is_watched);
    }

    #[test]
    fn test_promote_unknown_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(store.promote(&create_owned_item("ghost")).is_none());
    }

    #[test]
    fn test_absent_optionals_stay_out_of_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.json");
        let mut store = WatchlistStore::open(path.clone());
        store.add(create_item("No video attached")).unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        assert!(!raw.contains("thumbnail_url"));
        assert!(!raw.contains("external_video_id"));
        assert!(!raw.contains("user_id"));
    }
}
