use super::MoodArg;
use crate::app::App;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_core::{query, RecommendError, Recommendation, RecommendationEngine, TimeContext};
use watchlist_models::Mood;
use watchlist_remote::{NullRater, OpenRouterRater, TitleMoodRater};

pub async fn run_recommend(mood: Option<MoodArg>, output: &Output) -> Result<()> {
    let app = App::load()?;
    let items = app.store.read().await.snapshot();

    let mood = match mood {
        Some(arg) => Some(arg.into()),
        None => prompt_mood(output)?,
    };

    let watched = query::watched_items(&items);
    let unwatched = query::unwatched_items(&items);

    // Title analysis only enters the picture when a mood was given
    let rater: Box<dyn TitleMoodRater> = match &app.config.openrouter {
        Some(openrouter) if mood.is_some() && app.config.is_openrouter_configured() => Box::new(
            OpenRouterRater::new(openrouter.api_key.clone(), openrouter.model.clone()),
        ),
        _ => Box::new(NullRater),
    };
    let mut engine = RecommendationEngine::new(rater);

    let spinner = super::network_spinner(output, "Sizing up your watchlist...");
    let ctx = TimeContext::now();
    let result = engine.recommend(&watched, &unwatched, mood, &ctx).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let recommendation = match result {
        Ok(recommendation) => recommendation,
        Err(RecommendError::NoCandidates) => {
            return Err(eyre!(
                "No unwatched items to recommend. Add something with 'nextup add' first."
            ))
        }
    };

    render(&recommendation, output)
}

fn render(recommendation: &Recommendation, output: &Output) -> Result<()> {
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            let item = &recommendation.item;
            println!();
            println!(
                "  {} {}",
                "Next up:".bright_cyan().bold(),
                item.title.bold()
            );
            println!(
                "  {} | {}",
                item.content_type.label(),
                item.category.duration_hint()
            );
            if !recommendation.reason.is_empty() {
                println!();
                for line in recommendation.reason.lines() {
                    println!("  {}", line.bright_black());
                }
            }
            println!();
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "item": serde_json::to_value(&recommendation.item)?,
                "score": recommendation.score,
                "reason": recommendation.reason,
            }));
        }
    }
    Ok(())
}

/// Offer a mood picker when running interactively without --mood. Falls
/// back to no mood everywhere a prompt would be wrong (quiet, JSON, pipes).
fn prompt_mood(output: &Output) -> Result<Option<Mood>> {
    if output.format() != OutputFormat::Human || output.is_quiet() || !super::is_interactive() {
        return Ok(None);
    }

    let mut choices = vec!["No particular mood"];
    choices.extend(Mood::ALL.iter().map(|mood| mood.label()));
    let picked = dialoguer::Select::new()
        .with_prompt("How are you feeling?")
        .items(&choices)
        .default(0)
        .interact()
        .map_err(|e| eyre!("Failed to read selection: {}", e))?;

    Ok(if picked == 0 {
        None
    } else {
        Some(Mood::ALL[picked - 1])
    })
}
