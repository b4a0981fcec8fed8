use crate::app::App;
use crate::output::Output;
use color_eyre::Result;
use watchlist_models::WatchlistItem;

pub async fn run_done(ids: Vec<String>, output: &Output) -> Result<()> {
    let app = App::load()?;
    let snapshot = app.store.read().await.snapshot();
    let resolved = super::resolve_ids(&snapshot, &ids, output)?;
    if resolved.is_empty() {
        output.info("Nothing to update.");
        return Ok(());
    }

    // A single id toggles; several ids mark everything watched in one batch
    let updated: Vec<WatchlistItem> = {
        let mut store = app.store.write().await;
        if resolved.len() == 1 {
            store.toggle_watched(resolved[0]).into_iter().collect()
        } else {
            store.mark_watched(&resolved)
        }
    };

    for item in &updated {
        if let Some(sync) = &app.sync {
            sync.push_update(item.clone()).await;
        }
        let state = if item.is_watched { "watched" } else { "unwatched" };
        output.success(format!("Marked '{}' as {}", item.title, state));
    }
    app.flush().await;
    Ok(())
}
