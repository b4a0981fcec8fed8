pub mod item;
pub mod mood;
pub mod stats;

pub use item::{ContentType, WatchCategory, WatchlistItem};
pub use mood::{Mood, MoodSignal};
pub use stats::WatchlistStats;
