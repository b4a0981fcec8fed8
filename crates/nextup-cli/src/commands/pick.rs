use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use watchlist_core::query;

pub async fn run_pick(output: &Output) -> Result<()> {
    let app = App::load()?;
    let items = app.store.read().await.snapshot();

    let Some(pick) = query::random_unwatched(&items) else {
        return Err(eyre!(
            "No unwatched items to pick from. Add something with 'nextup add' first."
        ));
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            println!();
            println!("  {} {}", "Tonight:".bright_cyan().bold(), pick.title.bold());
            println!(
                "  {} | {}",
                pick.content_type.label(),
                pick.category.duration_hint()
            );
            println!();
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&pick)?);
        }
    }
    Ok(())
}
