use super::{CategoryArg, ContentTypeArg};
use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use watchlist_models::WatchlistItem;
use watchlist_remote::{VideoMetadataProvider, YoutubeMetadata};

pub async fn run_add(
    title: Option<String>,
    content_type: ContentTypeArg,
    category: CategoryArg,
    notes: Option<String>,
    video_id: Option<String>,
    output: &Output,
) -> Result<()> {
    let app = App::load()?;

    let mut fetched_title = String::new();
    let mut thumbnail_url = String::new();
    if let Some(video_id) = &video_id {
        match &app.config.youtube {
            Some(youtube) if app.config.is_youtube_configured() => {
                let spinner = super::network_spinner(output, "Looking up video...");
                let provider = YoutubeMetadata::new(youtube.api_key.clone());
                let (video_title, video_thumbnail) = provider.fetch(video_id).await;
                if let Some(spinner) = spinner {
                    spinner.finish_and_clear();
                }
                fetched_title = video_title;
                thumbnail_url = video_thumbnail;
                if fetched_title.is_empty() && title.is_none() {
                    output.warn(format!("Video lookup for '{}' came back empty", video_id));
                }
            }
            _ => output.warn("YouTube is not configured, adding without video metadata"),
        }
    }

    // An explicitly given title always beats the fetched one
    let title = match title {
        Some(title) => title,
        None if !fetched_title.is_empty() => fetched_title,
        None => {
            return Err(eyre!(
                "A title is required. Pass one, or use --video-id with YouTube configured."
            ))
        }
    };

    let mut item = WatchlistItem::new(
        title,
        content_type.into(),
        category.into(),
        notes.unwrap_or_default(),
    );
    if let Some(video_id) = video_id {
        let thumbnail = (!thumbnail_url.is_empty()).then_some(thumbnail_url);
        item = item.with_video(video_id, thumbnail);
    }

    let stored = {
        let mut store = app.store.write().await;
        store.add(item).map_err(|e| eyre!("{}", e))?
    };

    if let Some(sync) = &app.sync {
        sync.push_insert(stored.clone()).await;
    }
    app.flush().await;

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Added '{}' ({})",
                stored.title,
                super::short_id(stored.id)
            ));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(&stored)?);
        }
    }
    Ok(())
}
