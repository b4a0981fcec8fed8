use serde::{Deserialize, Serialize};

/// What the user feels like watching right now. Optional input to the
/// recommendation engine; `as_str` doubles as the cache / wire token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Wind down with something undemanding.
    Relaxed,
    /// Short and upbeat.
    Energetic,
    /// Pick up something new.
    Learn,
    /// Anything that breaks the routine.
    Bored,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Relaxed, Mood::Energetic, Mood::Learn, Mood::Bored];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Relaxed => "relaxed",
            Mood::Energetic => "energetic",
            Mood::Learn => "learn",
            Mood::Bored => "bored",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Relaxed => "Relaxed",
            Mood::Energetic => "Energetic",
            Mood::Learn => "Want to learn",
            Mood::Bored => "Bored",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Best-effort signal from the title analysis service: how well the content
/// implied by a title fits a mood, on a 0-10 scale, plus a short reason.
///
/// Unavailable or failed analysis is `none()` rather than an error so the
/// recommendation path never depends on the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodSignal {
    pub score: i64,
    pub reason: String,
}

impl MoodSignal {
    pub fn new(score: i64, reason: String) -> Self {
        Self { score, reason }
    }

    pub fn none() -> Self {
        Self::default()
    }
}
