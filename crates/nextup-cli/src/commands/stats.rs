use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;
use watchlist_core::query;

pub async fn run_stats(output: &Output) -> Result<()> {
    let app = App::load()?;
    let items = app.store.read().await.snapshot();
    let stats = query::statistics(&items);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec![Cell::new("Watchlist")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold)]);
            table.add_row(vec![Cell::new("Total items"), Cell::new(stats.total_items)]);
            table.add_row(vec![Cell::new("Watched"), Cell::new(stats.watched_items)]);
            table.add_row(vec![
                Cell::new("Unwatched"),
                Cell::new(stats.unwatched_items),
            ]);
            table.add_row(vec![
                Cell::new("Completion"),
                Cell::new(format!("{:.1}%", stats.completion_percentage())),
            ]);
            table.add_row(vec![
                Cell::new("Movies & series"),
                Cell::new(stats.movie_count),
            ]);
            table.add_row(vec![Cell::new("Videos"), Cell::new(stats.video_count)]);
            table.add_row(vec![Cell::new("Podcasts"), Cell::new(stats.podcast_count)]);
            table.add_row(vec![
                Cell::new("Quick watches"),
                Cell::new(stats.quick_count),
            ]);
            table.add_row(vec![Cell::new("Binge ready"), Cell::new(stats.long_count)]);
            table.add_row(vec![
                Cell::new("With notes"),
                Cell::new(stats.items_with_notes),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut data = serde_json::to_value(&stats)?;
            if let Some(object) = data.as_object_mut() {
                object.insert(
                    "completion_percentage".to_string(),
                    json!(stats.completion_percentage()),
                );
            }
            output.json(&data);
        }
    }
    Ok(())
}
