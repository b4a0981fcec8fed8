use crate::error::RecommendError;
use chrono::{DateTime, Datelike, Local, Timelike, Utc, Weekday};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use watchlist_models::{ContentType, Mood, MoodSignal, WatchCategory, WatchlistItem};
use watchlist_remote::TitleMoodRater;

const BASE_SCORE: i64 = 10;

/// Time-of-day flags the scorer works from. Derived once per pass so every
/// candidate sees the same clock.
#[derive(Debug, Clone, Copy)]
pub struct TimeContext {
    pub hour: u32,
    pub is_morning: bool,
    pub is_afternoon: bool,
    pub is_evening: bool,
    pub is_late_night: bool,
    pub is_weekend: bool,
    now_utc: DateTime<Utc>,
}

impl TimeContext {
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    pub fn from_datetime(now: DateTime<Local>) -> Self {
        let hour = now.hour();
        Self {
            hour,
            is_morning: (6..12).contains(&hour),
            is_afternoon: (12..17).contains(&hour),
            is_evening: (17..22).contains(&hour),
            is_late_night: hour >= 22 || hour < 6,
            is_weekend: matches!(now.weekday(), Weekday::Sat | Weekday::Sun),
            now_utc: now.with_timezone(&Utc),
        }
    }
}

/// Winning pick plus the bullet-point explanation shown to the user.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub item: WatchlistItem,
    pub score: i64,
    pub reason: String,
}

/// Scores unwatched items against the time of day, recent watch variety,
/// item age and an optional mood, then picks the highest.
///
/// Title analysis goes through the configured rater and is memoized per
/// (title, mood) for the engine's lifetime. Failed lookups are cached too,
/// so a dead service costs one call per distinct title, not one per pass.
pub struct RecommendationEngine {
    rater: Box<dyn TitleMoodRater>,
    title_mood_cache: HashMap<(String, Mood), MoodSignal>,
}

impl RecommendationEngine {
    pub fn new(rater: Box<dyn TitleMoodRater>) -> Self {
        Self {
            rater,
            title_mood_cache: HashMap::new(),
        }
    }

    /// Pick the best unwatched item. Ties keep the earliest candidate, so
    /// equal scores resolve the same way every run.
    pub async fn recommend(
        &mut self,
        watched: &[WatchlistItem],
        unwatched: &[WatchlistItem],
        mood: Option<Mood>,
        ctx: &TimeContext,
    ) -> Result<Recommendation, RecommendError> {
        if unwatched.is_empty() {
            return Err(RecommendError::NoCandidates);
        }

        let recent_types = recently_watched_types(watched);
        let mut best: Option<Recommendation> = None;

        for item in unwatched {
            let (mut score, mut reasons) = score_item(item, ctx, &recent_types, mood);

            // The title signal only enters the picture when a mood was
            // asked for; weak or empty signals score but stay out of the
            // explanation.
            if let Some(mood) = mood {
                let signal = self.title_signal(&item.title, mood).await;
                score += signal.score;
                if signal.score > 5 && !signal.reason.is_empty() {
                    reasons.push(signal.reason);
                }
            }

            debug!("Scored '{}': {}", item.title, score);

            let replace = match &best {
                Some(current) => score > current.score,
                None => true,
            };
            if replace {
                best = Some(Recommendation {
                    item: item.clone(),
                    score,
                    reason: format_reasons(&reasons),
                });
            }
        }

        best.ok_or(RecommendError::NoCandidates)
    }

    async fn title_signal(&mut self, title: &str, mood: Mood) -> MoodSignal {
        let key = (title.to_string(), mood);
        if let Some(cached) = self.title_mood_cache.get(&key) {
            return cached.clone();
        }
        let signal = self.rater.rate(title, mood).await;
        self.title_mood_cache.insert(key, signal.clone());
        signal
    }
}

/// Content types among the five most recently added watched items.
fn recently_watched_types(watched: &[WatchlistItem]) -> HashSet<ContentType> {
    let mut sorted: Vec<&WatchlistItem> = watched.iter().collect();
    sorted.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    sorted.iter().take(5).map(|item| item.content_type).collect()
}

/// Heuristic score for one candidate. Starts at the base, bonuses stack,
/// and reasons collect in trigger order.
fn score_item(
    item: &WatchlistItem,
    ctx: &TimeContext,
    recent_types: &HashSet<ContentType>,
    mood: Option<Mood>,
) -> (i64, Vec<String>) {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<String> = Vec::new();

    // Time-of-day slots are exclusive: the first matching one wins
    if ctx.is_evening && item.category == WatchCategory::Long {
        score += 15;
        reasons.push("perfect for evening viewing".to_string());
    } else if ctx.is_morning && item.category == WatchCategory::Quick {
        score += 15;
        reasons.push("great morning content".to_string());
    } else if ctx.is_afternoon {
        score += 10;
        reasons.push("good afternoon pick".to_string());
    }

    if !recent_types.contains(&item.content_type) {
        score += 20;
        reasons.push("different from your recent watches".to_string());
    }

    let days_old = item.days_in_list(ctx.now_utc);
    if days_old >= 7 {
        score += 10;
        reasons.push("waiting in your list for a while".to_string());
    }

    if ctx.is_weekend && item.category == WatchCategory::Long {
        score += 10;
        reasons.push("weekend is perfect for longer content".to_string());
    }

    if ctx.is_late_night && item.content_type == ContentType::Movie {
        score += 12;
        reasons.push("relaxing movie for late night".to_string());
    }

    match item.content_type {
        ContentType::Movie => {
            if ctx.is_evening || ctx.is_weekend {
                score += 8;
            }
        }
        ContentType::Video => {
            if ctx.is_morning || ctx.is_afternoon {
                score += 8;
            }
        }
        ContentType::Podcast => {
            if ctx.is_morning || ctx.is_afternoon {
                score += 5;
            }
        }
    }

    if let Some(mood) = mood {
        match mood {
            Mood::Relaxed => {
                if item.category == WatchCategory::Long
                    || item.content_type == ContentType::Movie
                {
                    score += 25;
                    reasons.push("perfect for a relaxed mood".to_string());
                } else {
                    score -= 5;
                }
            }
            Mood::Energetic => {
                if item.category == WatchCategory::Quick
                    || item.content_type == ContentType::Video
                {
                    score += 25;
                    reasons.push("energizing content to match your mood".to_string());
                } else {
                    score -= 5;
                }
            }
            Mood::Learn => {
                if item.content_type == ContentType::Podcast
                    || item.content_type == ContentType::Video
                {
                    score += 25;
                    reasons.push("educational content to satisfy your curiosity".to_string());
                } else {
                    score -= 5;
                }
            }
            // Boredom rewards novelty but never penalizes its absence
            Mood::Bored => {
                if !recent_types.contains(&item.content_type) || days_old >= 7 {
                    score += 20;
                    reasons.push("something different to break the boredom".to_string());
                }
            }
        }
    }

    (score, reasons)
}

fn format_reasons(reasons: &[String]) -> String {
    reasons
        .iter()
        .map(|reason| format!("• {}", reason))
        .collect::<Vec<_>>()
        .join("\n")
}
