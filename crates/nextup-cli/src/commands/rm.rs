use crate::app::App;
use crate::output::Output;
use color_eyre::Result;

pub async fn run_rm(ids: Vec<String>, output: &Output) -> Result<()> {
    let app = App::load()?;
    let snapshot = app.store.read().await.snapshot();
    let resolved = super::resolve_ids(&snapshot, &ids, output)?;
    if resolved.is_empty() {
        output.info("Nothing to remove.");
        return Ok(());
    }

    let removed = {
        let mut store = app.store.write().await;
        store.delete_many(&resolved)
    };

    for item in &removed {
        if let Some(sync) = &app.sync {
            sync.push_delete(item.clone()).await;
        }
        output.success(format!("Removed '{}'", item.title));
    }
    app.flush().await;
    Ok(())
}
