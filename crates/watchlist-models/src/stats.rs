use serde::{Deserialize, Serialize};

/// Aggregate counts over a watchlist snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistStats {
    pub total_items: usize,
    pub watched_items: usize,
    pub unwatched_items: usize,
    pub movie_count: usize,
    pub video_count: usize,
    pub podcast_count: usize,
    pub quick_count: usize,
    pub long_count: usize,
    pub items_with_notes: usize,
}

impl WatchlistStats {
    /// Watched share in percent. An empty list reads as 0.0, not NaN.
    pub fn completion_percentage(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        (self.watched_items as f64 / self.total_items as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_zero_for_empty_list() {
        assert_eq!(WatchlistStats::default().completion_percentage(), 0.0);
    }

    #[test]
    fn completion_is_exact() {
        let stats = WatchlistStats {
            total_items: 2,
            watched_items: 1,
            ..WatchlistStats::default()
        };
        assert_eq!(stats.completion_percentage(), 50.0);
    }
}
