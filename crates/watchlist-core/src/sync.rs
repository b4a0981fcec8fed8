use crate::store::WatchlistStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use watchlist_models::WatchlistItem;
use watchlist_remote::{RemoteRepository, SessionProvider};

/// Where the coordinator currently stands with the remote backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No usable session; everything stays local.
    Disconnected,
    /// Full reconciliation in flight.
    Syncing,
    /// Connected and not reconciling; `last_error` says how the most
    /// recent remote work went.
    Idle,
}

/// Outcome of a full reconciliation pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub fetched: usize,
    pub preserved_local: usize,
    pub pushed_inserts: usize,
    pub duration: Duration,
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Drives reconciliation between the local store and the remote backend.
///
/// The remote is authoritative for items it knows about; items it has
/// never seen are pushed up rather than discarded. Individual pushes are
/// fire-and-forget: failures are logged and recorded in `last_error`, and
/// the local mutation stands either way.
pub struct SyncCoordinator {
    store: Arc<RwLock<WatchlistStore>>,
    remote: Arc<dyn RemoteRepository>,
    session: Arc<dyn SessionProvider>,
    state: RwLock<SyncState>,
    last_error: Arc<RwLock<Option<String>>>,
    tasks: Mutex<JoinSet<()>>,
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<RwLock<WatchlistStore>>,
        remote: Arc<dyn RemoteRepository>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let state = if session.is_authenticated() {
            SyncState::Idle
        } else {
            SyncState::Disconnected
        };
        Self {
            store,
            remote,
            session,
            state: RwLock::new(state),
            last_error: Arc::new(RwLock::new(None)),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub async fn state(&self) -> SyncState {
        *self.state.read().await
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Full reconciliation: fetch the remote set, apply it as the
    /// authoritative view, then push every preserved local-only item.
    ///
    /// A fetch failure leaves the local store untouched. Push failures
    /// leave the affected items local-only for the next pass. Neither is
    /// raised to the caller; the report carries them instead.
    #[instrument(skip(self))]
    pub async fn sync_all(&self) -> SyncReport {
        let start = Instant::now();
        let mut report = SyncReport::default();

        let Some(owner) = self.owner_if_authenticated() else {
            debug!("Not signed in, skipping sync");
            self.set_state(SyncState::Disconnected).await;
            return report;
        };

        self.set_state(SyncState::Syncing).await;
        info!(operation = "sync_start", owner = %owner, "Starting watchlist reconciliation");

        // Fetch before taking the store lock; only the apply itself needs
        // to be atomic against other mutations.
        let remote_items = match self.remote.list_items(owner).await {
            Ok(items) => items,
            Err(e) => {
                let message = format!("Failed to fetch remote watchlist: {}", e);
                warn!(operation = "sync_fetch", error = %e, "Fetch failed, local data untouched");
                report.errors.push(message.clone());
                self.record_error(Some(message)).await;
                self.set_state(SyncState::Idle).await;
                report.duration = start.elapsed();
                return report;
            }
        };
        report.fetched = remote_items.len();

        let local_only = {
            let mut store = self.store.write().await;
            store.apply_remote(remote_items)
        };
        report.preserved_local = local_only.len();

        let pushes = local_only.iter().map(|item| {
            let remote = Arc::clone(&self.remote);
            async move { (item, remote.insert_item(item, owner).await) }
        });
        for (item, result) in futures::future::join_all(pushes).await {
            match result {
                Ok(stored) => {
                    let mut store = self.store.write().await;
                    if store.promote(&stored).is_none() {
                        debug!(id = %stored.id, "Item removed before promotion could land");
                    }
                    report.pushed_inserts += 1;
                }
                Err(e) => {
                    let message = format!("Failed to push '{}': {}", item.title, e);
                    warn!(operation = "sync_push", id = %item.id, error = %e, "Insert failed, item stays local-only");
                    report.errors.push(message);
                }
            }
        }

        self.record_error(report.errors.last().cloned()).await;
        report.duration = start.elapsed();

        info!(
            operation = "sync_complete",
            fetched = report.fetched,
            preserved = report.preserved_local,
            pushed = report.pushed_inserts,
            errors = report.errors.len(),
            duration_ms = report.duration.as_millis() as u64,
            "Reconciliation finished"
        );
        self.set_state(SyncState::Idle).await;
        report
    }

    /// Fire-and-forget insert for a newly added item. Skipped silently
    /// when signed out; the item stays local-only until the next full
    /// sync picks it up.
    pub async fn push_insert(&self, item: WatchlistItem) {
        let Some(owner) = self.owner_if_authenticated() else {
            debug!(id = %item.id, "Not signed in, item stays local-only");
            return;
        };
        let remote = Arc::clone(&self.remote);
        let store = Arc::clone(&self.store);
        let last_error = Arc::clone(&self.last_error);
        self.tasks.lock().await.spawn(async move {
            match remote.insert_item(&item, owner).await {
                Ok(stored) => {
                    store.write().await.promote(&stored);
                    debug!(id = %stored.id, "Pushed insert");
                }
                Err(e) => {
                    warn!(id = %item.id, error = %e, "Insert push failed, item stays local-only");
                    *last_error.write().await =
                        Some(format!("Failed to push '{}': {}", item.title, e));
                }
            }
        });
    }

    /// Fire-and-forget update. Items the remote has never seen are
    /// skipped; the next full sync inserts them with their current state.
    pub async fn push_update(&self, item: WatchlistItem) {
        if self.owner_if_authenticated().is_none() {
            debug!(id = %item.id, "Not signed in, update stays local");
            return;
        }
        if item.is_local_only() {
            debug!(id = %item.id, "Item never inserted remotely, skipping update push");
            return;
        }
        let remote = Arc::clone(&self.remote);
        let last_error = Arc::clone(&self.last_error);
        self.tasks.lock().await.spawn(async move {
            match remote.update_item(&item).await {
                Ok(()) => debug!(id = %item.id, "Pushed update"),
                Err(e) => {
                    warn!(id = %item.id, error = %e, "Update push failed");
                    *last_error.write().await =
                        Some(format!("Failed to push update for '{}': {}", item.title, e));
                }
            }
        });
    }

    /// Fire-and-forget delete. The local removal already happened and
    /// stands regardless of the outcome here.
    pub async fn push_delete(&self, item: WatchlistItem) {
        if self.owner_if_authenticated().is_none() {
            debug!(id = %item.id, "Not signed in, delete stays local");
            return;
        }
        if item.is_local_only() {
            debug!(id = %item.id, "Item never inserted remotely, nothing to delete");
            return;
        }
        let remote = Arc::clone(&self.remote);
        let last_error = Arc::clone(&self.last_error);
        self.tasks.lock().await.spawn(async move {
            match remote.delete_item(item.id).await {
                Ok(()) => debug!(id = %item.id, "Pushed delete"),
                Err(e) => {
                    warn!(id = %item.id, error = %e, "Delete push failed");
                    *last_error.write().await =
                        Some(format!("Failed to push delete for '{}': {}", item.title, e));
                }
            }
        });
    }

    /// Call after sign-in or sign-out. Sign-in starts a full
    /// reconciliation; sign-out keeps all local data and stops remote
    /// propagation.
    pub async fn handle_auth_change(&self) -> SyncReport {
        if self.session.is_authenticated() {
            self.sync_all().await
        } else {
            info!("Signed out, keeping local data and disabling remote propagation");
            self.set_state(SyncState::Disconnected).await;
            SyncReport::default()
        }
    }

    /// Wait for every outstanding push. Call before process exit so
    /// fire-and-forget work actually reaches the wire.
    pub async fn flush(&self) {
        let mut tasks = self.tasks.lock().await;
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Push task failed to complete: {}", e);
            }
        }
    }

    fn owner_if_authenticated(&self) -> Option<Uuid> {
        if !self.session.is_authenticated() {
            return None;
        }
        self.session.owner_id()
    }

    async fn set_state(&self, state: SyncState) {
        *self.state.write().await = state;
    }

    async fn record_error(&self, message: Option<String>) {
        *self.last_error.write().await = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;
    use watchlist_models::{ContentType, WatchCategory};
    use watchlist_remote::RemoteError;

    fn create_item(title: &str) -> WatchlistItem {
        WatchlistItem::new(
            title.to_string(),
            ContentType::Video,
            WatchCategory::Quick,
            String::new(),
        )
    }

    #[derive(Default)]
    struct MockRemote {
        rows: StdMutex<Vec<WatchlistItem>>,
        fail_list: bool,
        fail_insert: bool,
        fail_delete: bool,
        list_calls: AtomicUsize,
        insert_calls: AtomicUsize,
        update_calls: AtomicUsize,
        delete_calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteRepository for MockRemote {
        async fn list_items(&self, _owner: Uuid) -> Result<Vec<WatchlistItem>, RemoteError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(RemoteError::new("list refused".to_string()));
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn insert_item(
            &self,
            item: &WatchlistItem,
            owner: Uuid,
        ) -> Result<WatchlistItem, RemoteError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert {
                return Err(RemoteError::new("insert refused".to_string()));
            }
            let mut stored = item.clone();
            stored.owner_id = Some(owner);
            stored.created_at = Some(Utc::now());
            stored.updated_at = Some(Utc::now());
            self.rows.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn update_item(&self, _item: &WatchlistItem) -> Result<(), RemoteError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn delete_item(&self, _id: Uuid) -> Result<(), RemoteError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete {
                return Err(RemoteError::new("delete refused".to_string()));
            }
            Ok(())
        }
    }

    struct StaticSession {
        owner: Option<Uuid>,
    }

    impl SessionProvider for StaticSession {
        fn is_authenticated(&self) -> bool {
            self.owner.is_some()
        }

        fn owner_id(&self) -> Option<Uuid> {
            self.owner
        }
    }

    fn coordinator(
        dir: &TempDir,
        remote: MockRemote,
        owner: Option<Uuid>,
    ) -> (SyncCoordinator, Arc<RwLock<WatchlistStore>>, Arc<MockRemote>) {
        let store = Arc::new(RwLock::new(WatchlistStore::open(
            dir.path().join("watchlist.json"),
        )));
        let remote = Arc::new(remote);
        let coordinator = SyncCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&remote) as Arc<dyn RemoteRepository>,
            Arc::new(StaticSession { owner }),
        );
        (coordinator, store, remote)
    }

    #[tokio::test]
    async fn test_sync_skipped_when_signed_out() {
        let dir = TempDir::new().unwrap();
        let (coordinator, store, remote) = coordinator(&dir, MockRemote::default(), None);
        store.write().await.add(create_item("Local")).unwrap();

        let report = coordinator.sync_all().await;

        assert_eq!(report.fetched, 0);
        assert!(report.is_clean());
        assert_eq!(remote.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(coordinator.state().await, SyncState::Disconnected);
        assert_eq!(store.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sync_replaces_preserves_and_pushes() {
        let dir = TempDir::new().unwrap();
        let owner = Uuid::new_v4();

        let mut synced = create_item("Synced earlier");
        synced.owner_id = Some(owner);
        let mut renamed = synced.clone();
        renamed.title = "Synced earlier (renamed)".to_string();
        let mut from_other_device = create_item("From another device");
        from_other_device.owner_id = Some(owner);

        let remote = MockRemote::default();
        remote
            .rows
            .lock()
            .unwrap()
            .extend([renamed.clone(), from_other_device.clone()]);

        let (coordinator, store, remote) = coordinator(&dir, remote, Some(owner));
        let local_draft = {
            let mut store = store.write().await;
            store.add(synced).unwrap();
            store.add(create_item("Local draft")).unwrap()
        };

        let report = coordinator.sync_all().await;

        assert!(report.is_clean());
        assert_eq!(report.fetched, 2);
        assert_eq!(report.preserved_local, 1);
        assert_eq!(report.pushed_inserts, 1);
        assert_eq!(remote.insert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.state().await, SyncState::Idle);
        assert!(coordinator.last_error().await.is_none());

        let store = store.read().await;
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(renamed.id).unwrap().title,
            "Synced earlier (renamed)"
        );
        // The pushed draft now carries the owner but kept its id
        let promoted = store.get(local_draft.id).unwrap();
        assert_eq!(promoted.owner_id, Some(owner));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_local_data_untouched() {
        let dir = TempDir::new().unwrap();
        let remote = MockRemote {
            fail_list: true,
            ..MockRemote::default()
        };
        let (coordinator, store, _) = coordinator(&dir, remote, Some(Uuid::new_v4()));
        store.write().await.add(create_item("Keep me")).unwrap();

        let report = coordinator.sync_all().await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(store.read().await.len(), 1);
        assert_eq!(coordinator.state().await, SyncState::Idle);
        assert!(coordinator.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_insert_failure_keeps_item_local_only() {
        let dir = TempDir::new().unwrap();
        let remote = MockRemote {
            fail_insert: true,
            ..MockRemote::default()
        };
        let (coordinator, store, _) = coordinator(&dir, remote, Some(Uuid::new_v4()));
        let draft = store.write().await.add(create_item("Draft")).unwrap();

        let report = coordinator.sync_all().await;

        assert_eq!(report.preserved_local, 1);
        assert_eq!(report.pushed_inserts, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(store.read().await.get(draft.id).unwrap().is_local_only());
    }

    #[tokio::test]
    async fn test_push_insert_promotes_after_flush() {
        let dir = TempDir::new().unwrap();
        let owner = Uuid::new_v4();
        let (coordinator, store, remote) = coordinator(&dir, MockRemote::default(), Some(owner));
        let item = store.write().await.add(create_item("New")).unwrap();

        coordinator.push_insert(item.clone()).await;
        coordinator.flush().await;

        assert_eq!(remote.insert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.read().await.get(item.id).unwrap().owner_id, Some(owner));
    }

    #[tokio::test]
    async fn test_push_insert_skipped_when_signed_out() {
        let dir = TempDir::new().unwrap();
        let (coordinator, store, remote) = coordinator(&dir, MockRemote::default(), None);
        let item = store.write().await.add(create_item("Offline")).unwrap();

        coordinator.push_insert(item.clone()).await;
        coordinator.flush().await;

        assert_eq!(remote.insert_calls.load(Ordering::SeqCst), 0);
        assert!(store.read().await.get(item.id).unwrap().is_local_only());
    }

    #[tokio::test]
    async fn test_push_update_skips_local_only_items() {
        let dir = TempDir::new().unwrap();
        let (coordinator, _, remote) =
            coordinator(&dir, MockRemote::default(), Some(Uuid::new_v4()));

        coordinator.push_update(create_item("Never inserted")).await;
        coordinator.flush().await;

        assert_eq!(remote.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_push_delete_failure_records_error_only() {
        let dir = TempDir::new().unwrap();
        let owner = Uuid::new_v4();
        let remote = MockRemote {
            fail_delete: true,
            ..MockRemote::default()
        };
        let (coordinator, store, remote) = coordinator(&dir, remote, Some(owner));
        let mut item = create_item("Doomed");
        item.owner_id = Some(owner);
        let item = store.write().await.add(item).unwrap();

        let removed = store.write().await.delete(item.id).unwrap();
        coordinator.push_delete(removed).await;
        coordinator.flush().await;

        assert_eq!(remote.delete_calls.load(Ordering::SeqCst), 1);
        assert!(store.read().await.get(item.id).is_none());
        assert!(coordinator.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_auth_change_to_signed_out_disconnects() {
        let dir = TempDir::new().unwrap();
        let (coordinator, store, _) = coordinator(&dir, MockRemote::default(), None);
        store.write().await.add(create_item("Stays")).unwrap();

        let report = coordinator.handle_auth_change().await;

        assert_eq!(report.fetched, 0);
        assert_eq!(coordinator.state().await, SyncState::Disconnected);
        assert_eq!(store.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_auth_change_to_signed_in_runs_full_sync() {
        let dir = TempDir::new().unwrap();
        let owner = Uuid::new_v4();
        let (coordinator, store, remote) = coordinator(&dir, MockRemote::default(), Some(owner));
        store.write().await.add(create_item("Draft")).unwrap();

        let report = coordinator.handle_auth_change().await;

        assert_eq!(remote.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.pushed_inserts, 1);
        assert_eq!(coordinator.state().await, SyncState::Idle);
    }
}
