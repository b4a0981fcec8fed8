use super::{CategoryArg, ContentTypeArg};
use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use watchlist_core::query;
use watchlist_core::SearchFilter;

pub async fn run_search(
    query_text: String,
    content_type: Option<ContentTypeArg>,
    category: Option<CategoryArg>,
    watched: bool,
    unwatched: bool,
    with_notes: bool,
    without_notes: bool,
    output: &Output,
) -> Result<()> {
    let app = App::load()?;
    let items = app.store.read().await.snapshot();

    let filter = SearchFilter {
        query: query_text,
        content_type: content_type.map(Into::into),
        category: category.map(Into::into),
        watched: super::flag_filter(watched, unwatched),
        has_notes: super::flag_filter(with_notes, without_notes),
    };
    let results = query::advanced_search(&items, &filter);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if results.is_empty() {
                output.info("No items match.");
                return Ok(());
            }
            println!("{}", super::items_table(&results));
            output.info(format!("{} match(es)", results.len()));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&results)?);
        }
    }
    Ok(())
}
