//! Series/episode title splitting.

use regex::Regex;
use std::sync::OnceLock;

use super::TitleKey;
use crate::io::ViewEvent;

fn episode_regex() -> &'static Regex {
    static EPISODE: OnceLock<Regex> = OnceLock::new();
    EPISODE.get_or_init(|| Regex::new(r".+Episode [0-9]+.*$").unwrap())
}

/// Reduces an episode title such as
/// `Blue Mountain State: Season 1: Promise Ring (Episode 2)` to the series
/// name. Titles whose last `:` segment carries no `Episode <n>` marker are
/// returned unchanged.
pub fn split_title(raw_title: &str) -> &str {
    let mut segments = raw_title.split(':');
    let first = segments.next().unwrap_or(raw_title);
    match raw_title.rsplit(':').next() {
        Some(last) if raw_title.contains(':') && episode_regex().is_match(last) => first,
        _ => raw_title,
    }
}

impl TitleKey {
    pub fn from_raw_title(raw_title: &str) -> Self {
        let split = split_title(raw_title);
        Self {
            split_title: split.to_string(),
            is_series: split != raw_title,
        }
    }
}

/// Distinct title keys of one profile's events, in first-seen order.
pub fn distinct_title_keys(events: &[ViewEvent], profile_name: &str) -> Vec<TitleKey> {
    let mut seen = std::collections::HashSet::new();
    events
        .iter()
        .filter(|event| event.profile_name == profile_name)
        .map(|event| TitleKey::from_raw_title(&event.title))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_episode_title() {
        assert_eq!(
            split_title("Blue Mountain State: Season 1: Promise Ring (Episode 2)"),
            "Blue Mountain State"
        );
        assert_eq!(
            split_title("Brooklyn Nine-Nine: Season 3: The Funeral (Episode 5)"),
            "Brooklyn Nine-Nine"
        );
        assert_eq!(
            split_title("Superstore: Season 2: Episode 7"),
            "Superstore"
        );
    }

    #[test]
    fn test_titles_without_episode_marker_are_unchanged() {
        assert_eq!(
            split_title("The Huntsman: Winter's War"),
            "The Huntsman: Winter's War"
        );
        assert_eq!(
            split_title("The Shawshank Redemption"),
            "The Shawshank Redemption"
        );
        // The marker only counts in the final segment.
        assert_eq!(
            split_title("Episode 1 Recap: The Movie"),
            "Episode 1 Recap: The Movie"
        );
        // A bare "Episode 3" without a colon is not a series suffix.
        assert_eq!(split_title("Episode 3"), "Episode 3");
    }

    #[test]
    fn test_title_key_series_flag() {
        let series = TitleKey::from_raw_title("Superstore: Season 2: Episode 7");
        assert_eq!(series.split_title, "Superstore");
        assert!(series.is_series);

        let movie = TitleKey::from_raw_title("Little Women");
        assert_eq!(movie.split_title, "Little Women");
        assert!(!movie.is_series);
    }
}
