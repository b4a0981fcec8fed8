use super::{CategoryArg, ContentTypeArg, SortArg};
use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use watchlist_core::query;
use watchlist_core::SearchFilter;

pub async fn run_list(
    content_type: Option<ContentTypeArg>,
    category: Option<CategoryArg>,
    watched: bool,
    unwatched: bool,
    sort: SortArg,
    output: &Output,
) -> Result<()> {
    let app = App::load()?;
    let items = app.store.read().await.snapshot();

    let filter = SearchFilter {
        content_type: content_type.map(Into::into),
        category: category.map(Into::into),
        watched: super::flag_filter(watched, unwatched),
        ..SearchFilter::default()
    };
    let results = query::advanced_search(&items, &filter);
    let results = query::sort_items(&results, sort.into());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if items.is_empty() {
                output.info("Watchlist is empty. Add something with 'nextup add <title>'.");
                return Ok(());
            }
            if results.is_empty() {
                output.info("No items match the given filters.");
                return Ok(());
            }
            println!("{}", super::items_table(&results));
            output.info(format!("{} of {} item(s)", results.len(), items.len()));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&results)?);
        }
    }
    Ok(())
}
