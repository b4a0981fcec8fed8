use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchlist_remote::SessionProvider;

pub async fn run_sync(output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let app = App::load()?;
    let Some(sync) = &app.sync else {
        return Err(eyre!(
            "Supabase backend is not configured. Run 'nextup config init' and fill in the [supabase] section."
        ));
    };
    if !app.session.is_authenticated() {
        return Err(eyre!("Not signed in. Run 'nextup auth login' first."));
    }

    let spinner = super::network_spinner(output, "Reconciling with the remote watchlist...");
    let report = sync.sync_all().await;
    sync.flush().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match output.format() {
        OutputFormat::Human => {
            for error in &report.errors {
                output.warn(error);
            }
            output.success(format!(
                "Sync finished: {} remote item(s), {} kept local, {} pushed in {:?}",
                report.fetched, report.preserved_local, report.pushed_inserts, report.duration
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "success": report.is_clean(),
                "fetched": report.fetched,
                "preserved_local": report.preserved_local,
                "pushed_inserts": report.pushed_inserts,
                "duration_seconds": report.duration.as_secs_f64(),
                "errors": report.errors,
            }));
        }
    }
    Ok(())
}
