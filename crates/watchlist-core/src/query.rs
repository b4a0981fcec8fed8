use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use watchlist_models::{ContentType, WatchCategory, WatchlistItem, WatchlistStats};

/// Case-insensitive substring match over title and notes. An empty query
/// matches everything.
pub fn search(items: &[WatchlistItem], query: &str) -> Vec<WatchlistItem> {
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.title.to_lowercase().contains(&needle)
                || item.notes.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Composable criteria for `advanced_search`; every populated field must
/// match.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub query: String,
    pub content_type: Option<ContentType>,
    pub category: Option<WatchCategory>,
    pub watched: Option<bool>,
    pub has_notes: Option<bool>,
}

pub fn advanced_search(items: &[WatchlistItem], filter: &SearchFilter) -> Vec<WatchlistItem> {
    let mut results = search(items, &filter.query);
    if let Some(content_type) = filter.content_type {
        results.retain(|item| item.content_type == content_type);
    }
    if let Some(category) = filter.category {
        results.retain(|item| item.category == category);
    }
    if let Some(watched) = filter.watched {
        results.retain(|item| item.is_watched == watched);
    }
    if let Some(has_notes) = filter.has_notes {
        results.retain(|item| {
            if has_notes {
                !item.notes.is_empty()
            } else {
                item.notes.is_empty()
            }
        });
    }
    results
}

pub fn unwatched_items(items: &[WatchlistItem]) -> Vec<WatchlistItem> {
    items.iter().filter(|item| !item.is_watched).cloned().collect()
}

pub fn watched_items(items: &[WatchlistItem]) -> Vec<WatchlistItem> {
    items.iter().filter(|item| item.is_watched).cloned().collect()
}

pub fn items_by_type(items: &[WatchlistItem], content_type: ContentType) -> Vec<WatchlistItem> {
    items
        .iter()
        .filter(|item| item.content_type == content_type)
        .cloned()
        .collect()
}

pub fn items_by_category(items: &[WatchlistItem], category: WatchCategory) -> Vec<WatchlistItem> {
    items
        .iter()
        .filter(|item| item.category == category)
        .cloned()
        .collect()
}

/// Unwatched short-form items, for the "something under half an hour" ask.
pub fn quick_picks(items: &[WatchlistItem]) -> Vec<WatchlistItem> {
    items
        .iter()
        .filter(|item| !item.is_watched && item.category == WatchCategory::Quick)
        .cloned()
        .collect()
}

/// Unwatched long-form items.
pub fn binge_picks(items: &[WatchlistItem]) -> Vec<WatchlistItem> {
    items
        .iter()
        .filter(|item| !item.is_watched && item.category == WatchCategory::Long)
        .cloned()
        .collect()
}

/// Items added within the last `days` days, newest first.
pub fn recent_items(items: &[WatchlistItem], days: i64) -> Vec<WatchlistItem> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut results: Vec<WatchlistItem> = items
        .iter()
        .filter(|item| item.date_added >= cutoff)
        .cloned()
        .collect();
    results.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    results
}

/// Items added between `from` and `to`, both ends inclusive.
pub fn items_in_date_range(
    items: &[WatchlistItem],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<WatchlistItem> {
    items
        .iter()
        .filter(|item| item.date_added >= from && item.date_added <= to)
        .cloned()
        .collect()
}

/// The ways a listing can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    DateAddedNewest,
    DateAddedOldest,
    TitleAscending,
    TitleDescending,
    TypeAscending,
    CategoryAscending,
}

/// Sorted copy of the list. Titles compare case-insensitively; type and
/// category order lexicographically by their display labels, matching how
/// the listing renders them.
pub fn sort_items(items: &[WatchlistItem], option: SortOption) -> Vec<WatchlistItem> {
    let mut sorted = items.to_vec();
    match option {
        SortOption::DateAddedNewest => sorted.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        SortOption::DateAddedOldest => sorted.sort_by(|a, b| a.date_added.cmp(&b.date_added)),
        SortOption::TitleAscending => {
            sorted.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        SortOption::TitleDescending => {
            sorted.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortOption::TypeAscending => {
            sorted.sort_by(|a, b| a.content_type.label().cmp(b.content_type.label()))
        }
        SortOption::CategoryAscending => {
            sorted.sort_by(|a, b| a.category.label().cmp(b.category.label()))
        }
    }
    sorted
}

/// Aggregate counts over the whole list.
pub fn statistics(items: &[WatchlistItem]) -> WatchlistStats {
    let mut stats = WatchlistStats {
        total_items: items.len(),
        ..WatchlistStats::default()
    };
    for item in items {
        if item.is_watched {
            stats.watched_items += 1;
        }
        match item.content_type {
            ContentType::Movie => stats.movie_count += 1,
            ContentType::Video => stats.video_count += 1,
            ContentType::Podcast => stats.podcast_count += 1,
        }
        match item.category {
            WatchCategory::Quick => stats.quick_count += 1,
            WatchCategory::Long => stats.long_count += 1,
        }
        if !item.notes.is_empty() {
            stats.items_with_notes += 1;
        }
    }
    stats.unwatched_items = stats.total_items - stats.watched_items;
    stats
}

/// A random unwatched item, for when choosing is the hard part.
pub fn random_unwatched(items: &[WatchlistItem]) -> Option<WatchlistItem> {
    let unwatched: Vec<&WatchlistItem> = items.iter().filter(|item| !item.is_watched).collect();
    unwatched.choose(&mut rand::rng()).map(|item| (*item).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_item(title: &str, content_type: ContentType, category: WatchCategory) -> WatchlistItem {
        WatchlistItem::new(title.to_string(), content_type, category, String::new())
    }

    fn with_notes(mut item: WatchlistItem, notes: &str) -> WatchlistItem {
        item.notes = notes.to_string();
        item
    }

    fn watched(mut item: WatchlistItem) -> WatchlistItem {
        item.is_watched = true;
        item
    }

    fn sample() -> Vec<WatchlistItem> {
        vec![
            with_notes(
                create_item("Blade Runner", ContentType::Movie, WatchCategory::Long),
                "rewatch the final cut",
            ),
            watched(create_item(
                "Hard Fork",
                ContentType::Podcast,
                WatchCategory::Quick,
            )),
            create_item("rust streams", ContentType::Video, WatchCategory::Quick),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_notes() {
        let items = sample();

        let by_title = search(&items, "BLADE");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Blade Runner");

        let by_notes = search(&items, "Final Cut");
        assert_eq!(by_notes.len(), 1);
        assert_eq!(by_notes[0].title, "Blade Runner");

        assert!(search(&items, "zzz").is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let items = sample();
        assert_eq!(search(&items, "").len(), 3);
    }

    #[test]
    fn test_advanced_search_composes_with_and() {
        let items = sample();

        let filter = SearchFilter {
            category: Some(WatchCategory::Quick),
            watched: Some(false),
            ..SearchFilter::default()
        };
        let results = advanced_search(&items, &filter);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "rust streams");

        let filter = SearchFilter {
            query: "rust".to_string(),
            content_type: Some(ContentType::Podcast),
            ..SearchFilter::default()
        };
        assert!(advanced_search(&items, &filter).is_empty());
    }

    #[test]
    fn test_has_notes_filters_both_ways() {
        let items = sample();

        let noted = advanced_search(
            &items,
            &SearchFilter {
                has_notes: Some(true),
                ..SearchFilter::default()
            },
        );
        assert_eq!(noted.len(), 1);
        assert_eq!(noted[0].title, "Blade Runner");

        let unnoted = advanced_search(
            &items,
            &SearchFilter {
                has_notes: Some(false),
                ..SearchFilter::default()
            },
        );
        assert_eq!(unnoted.len(), 2);
    }

    #[test]
    fn test_type_and_category_filters() {
        let items = sample();
        assert_eq!(items_by_type(&items, ContentType::Movie).len(), 1);
        assert_eq!(items_by_category(&items, WatchCategory::Quick).len(), 2);
        assert_eq!(quick_picks(&items).len(), 1);
        assert_eq!(binge_picks(&items).len(), 1);
        assert_eq!(watched_items(&items).len(), 1);
        assert_eq!(unwatched_items(&items).len(), 2);
    }

    #[test]
    fn test_recent_items_sorted_newest_first() {
        let mut old = create_item("Old", ContentType::Video, WatchCategory::Quick);
        old.date_added = Utc::now() - Duration::days(30);
        let mut yesterday = create_item("Yesterday", ContentType::Video, WatchCategory::Quick);
        yesterday.date_added = Utc::now() - Duration::days(1);
        let today = create_item("Today", ContentType::Video, WatchCategory::Quick);

        let results = recent_items(&[old, yesterday, today], 7);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Today");
        assert_eq!(results[1].title, "Yesterday");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let mut item = create_item("Edge", ContentType::Video, WatchCategory::Quick);
        let moment = Utc::now() - Duration::days(3);
        item.date_added = moment;

        assert_eq!(items_in_date_range(&[item.clone()], moment, moment).len(), 1);
        assert!(items_in_date_range(
            &[item.clone()],
            moment + Duration::seconds(1),
            Utc::now()
        )
        .is_empty());
        assert!(
            items_in_date_range(&[item], moment - Duration::days(1), moment - Duration::seconds(1))
                .is_empty()
        );
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let items = vec![
            create_item("banana", ContentType::Video, WatchCategory::Quick),
            create_item("Apple", ContentType::Video, WatchCategory::Quick),
            create_item("cherry", ContentType::Video, WatchCategory::Quick),
        ];

        let ascending = sort_items(&items, SortOption::TitleAscending);
        let titles: Vec<&str> = ascending.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);

        let descending = sort_items(&items, SortOption::TitleDescending);
        assert_eq!(descending[0].title, "cherry");
    }

    #[test]
    fn test_category_sort_uses_labels() {
        let items = vec![
            create_item("q", ContentType::Video, WatchCategory::Quick),
            create_item("l", ContentType::Video, WatchCategory::Long),
        ];

        // "Binge Ready" sorts before "Quick Watch"
        let sorted = sort_items(&items, SortOption::CategoryAscending);
        assert_eq!(sorted[0].category, WatchCategory::Long);
    }

    #[test]
    fn test_date_sorts() {
        let mut first = create_item("first", ContentType::Video, WatchCategory::Quick);
        first.date_added = Utc::now() - Duration::days(2);
        let second = create_item("second", ContentType::Video, WatchCategory::Quick);

        let newest = sort_items(&[first.clone(), second.clone()], SortOption::DateAddedNewest);
        assert_eq!(newest[0].title, "second");

        let oldest = sort_items(&[second, first], SortOption::DateAddedOldest);
        assert_eq!(oldest[0].title, "first");
    }

    #[test]
    fn test_statistics_counts() {
        let stats = statistics(&sample());
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.watched_items, 1);
        assert_eq!(stats.unwatched_items, 2);
        assert_eq!(stats.movie_count, 1);
        assert_eq!(stats.video_count, 1);
        assert_eq!(stats.podcast_count, 1);
        assert_eq!(stats.quick_count, 2);
        assert_eq!(stats.long_count, 1);
        assert_eq!(stats.items_with_notes, 1);
        assert!((stats.completion_percentage() - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_statistics_empty_list() {
        let stats = statistics(&[]);
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.completion_percentage(), 0.0);
    }

    #[test]
    fn test_random_unwatched_skips_watched_items() {
        let items = vec![
            watched(create_item("seen", ContentType::Video, WatchCategory::Quick)),
            create_item("unseen", ContentType::Video, WatchCategory::Quick),
        ];

        for _ in 0..10 {
            let pick = random_unwatched(&items).unwrap();
            assert_eq!(pick.title, "unseen");
        }

        let all_watched = vec![watched(create_item(
            "seen",
            ContentType::Video,
            WatchCategory::Quick,
        ))];
        assert!(random_unwatched(&all_watched).is_none());
    }
}
