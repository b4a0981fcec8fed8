pub mod add;
pub mod auth;
pub mod config;
pub mod done;
pub mod list;
pub mod pick;
pub mod prompts;
pub mod recommend;
pub mod rm;
pub mod search;
pub mod stats;
pub mod sync;

use crate::output::Output;
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use uuid::Uuid;
use watchlist_core::SortOption;
use watchlist_models::{ContentType, Mood, WatchCategory, WatchlistItem};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContentTypeArg {
    Movie,
    Video,
    Podcast,
}

impl From<ContentTypeArg> for ContentType {
    fn from(arg: ContentTypeArg) -> Self {
        match arg {
            ContentTypeArg::Movie => ContentType::Movie,
            ContentTypeArg::Video => ContentType::Video,
            ContentTypeArg::Podcast => ContentType::Podcast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    /// Under 30 minutes
    Quick,
    /// 30+ minutes
    Long,
}

impl From<CategoryArg> for WatchCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Quick => WatchCategory::Quick,
            CategoryArg::Long => WatchCategory::Long,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoodArg {
    Relaxed,
    Energetic,
    Learn,
    Bored,
}

impl From<MoodArg> for Mood {
    fn from(arg: MoodArg) -> Self {
        match arg {
            MoodArg::Relaxed => Mood::Relaxed,
            MoodArg::Energetic => Mood::Energetic,
            MoodArg::Learn => Mood::Learn,
            MoodArg::Bored => Mood::Bored,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    Title,
    #[value(name = "title-desc")]
    TitleDesc,
    Type,
    Category,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortOption::DateAddedNewest,
            SortArg::Oldest => SortOption::DateAddedOldest,
            SortArg::Title => SortOption::TitleAscending,
            SortArg::TitleDesc => SortOption::TitleDescending,
            SortArg::Type => SortOption::TypeAscending,
            SortArg::Category => SortOption::CategoryAscending,
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Three-state filter from a pair of mutually exclusive flags.
pub fn flag_filter(yes: bool, no: bool) -> Option<bool> {
    if yes {
        Some(true)
    } else if no {
        Some(false)
    } else {
        None
    }
}

/// Spinner shown while a command talks to the network. Only appears in
/// interactive human-mode runs; everything else stays on structured logging.
pub fn network_spinner(output: &Output, message: &str) -> Option<ProgressBar> {
    use crate::output::OutputFormat;
    if output.format() != OutputFormat::Human || output.is_quiet() || !is_interactive() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    Some(spinner)
}

/// Resolve user-supplied ids against the current list. Accepts full uuids
/// or unique prefixes of the hyphenated form. Unknown ids warn and are
/// skipped; ambiguous prefixes are an error.
pub fn resolve_ids(
    items: &[WatchlistItem],
    raw_ids: &[String],
    output: &Output,
) -> Result<Vec<Uuid>> {
    let mut resolved = Vec::new();
    for raw in raw_ids {
        let needle = raw.to_lowercase();
        let matches: Vec<&WatchlistItem> = items
            .iter()
            .filter(|item| item.id.to_string().starts_with(&needle))
            .collect();
        match matches.len() {
            0 => output.warn(format!("No item matches id '{}'", raw)),
            1 => resolved.push(matches[0].id),
            n => {
                return Err(eyre!(
                    "Id '{}' is ambiguous ({} matches). Give more characters, see 'nextup list'.",
                    raw,
                    n
                ))
            }
        }
    }
    Ok(resolved)
}

pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Shared table rendering for `list` and `search`.
pub fn items_table(items: &[WatchlistItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Type"),
        Cell::new("Category"),
        Cell::new("Added"),
        Cell::new("Seen"),
        Cell::new("Notes"),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(short_id(item.id)),
            Cell::new(&item.title),
            Cell::new(item.content_type.label()),
            Cell::new(item.category.label()),
            Cell::new(item.date_added.format("%Y-%m-%d").to_string()),
            Cell::new(if item.is_watched {
                "✓".green().to_string()
            } else {
                String::new()
            }),
            Cell::new(truncate(&item.notes, 40)),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}
