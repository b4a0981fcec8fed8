use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use watchlist_config::{Config, PathManager};
use watchlist_core::{SyncCoordinator, WatchlistStore};
use watchlist_remote::{RemoteRepository, SavedSession, SessionProvider, SupabaseClient};

/// Everything a command needs: paths, config, the local store and, when a
/// backend is configured, the sync coordinator.
///
/// Commands work against the store unconditionally; `sync` is `None` when
/// no Supabase section is configured, which keeps every command fully
/// usable offline.
pub struct App {
    pub paths: PathManager,
    pub config: Config,
    pub store: Arc<RwLock<WatchlistStore>>,
    pub session: Arc<SavedSession>,
    pub sync: Option<SyncCoordinator>,
}

impl App {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let store = Arc::new(RwLock::new(WatchlistStore::open(paths.store_file())));
        let session = Arc::new(SavedSession::load(&paths));

        let sync = match &config.supabase {
            Some(supabase) if config.is_supabase_configured() => {
                let mut client =
                    SupabaseClient::new(supabase.url.clone(), supabase.anon_key.clone());
                if let Some(token) = session.access_token() {
                    client = client.with_access_token(token.to_string());
                }
                Some(SyncCoordinator::new(
                    Arc::clone(&store),
                    Arc::new(client) as Arc<dyn RemoteRepository>,
                    Arc::clone(&session) as Arc<dyn SessionProvider>,
                ))
            }
            _ => None,
        };

        Ok(Self {
            paths,
            config,
            store,
            session,
            sync,
        })
    }

    /// Wait for outstanding fire-and-forget pushes. Call before a command
    /// returns so nothing is lost when the process exits.
    pub async fn flush(&self) {
        if let Some(sync) = &self.sync {
            sync.flush().await;
        }
    }
}
