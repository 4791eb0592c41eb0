//! What a profile watches: titles, streaming countries and origin countries.

use chrono::{NaiveDate, TimeDelta};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::enrichment::{split_title, EnrichedViewEvent};
use crate::io::ViewEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct TitleWatchStats {
    pub title: String,
    pub total_duration: TimeDelta,
    /// Days on which the title was started
    pub times_watched: usize,
}

/// Titles ranked by total watching time. Repeated starts of the same title on
/// one day count once. With `group_episodes` every episode is credited to
/// its series.
pub fn most_watched_titles(events: &[ViewEvent], group_episodes: bool) -> Vec<TitleWatchStats> {
    let mut seen: HashSet<(NaiveDate, &str)> = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (TimeDelta, usize)> = HashMap::new();

    for event in events {
        if !seen.insert((event.start_time.date(), event.title.as_str())) {
            continue;
        }
        let title = if group_episodes {
            split_title(&event.title)
        } else {
            event.title.as_str()
        };

        let entry = totals.entry(title.to_string()).or_insert_with(|| {
            order.push(title.to_string());
            (TimeDelta::zero(), 0)
        });
        entry.0 += event.duration;
        entry.1 += 1;
    }

    let mut stats: Vec<TitleWatchStats> = order
        .into_iter()
        .filter_map(|title| {
            totals.remove(&title).map(|(total_duration, times_watched)| TitleWatchStats {
                title,
                total_duration,
                times_watched,
            })
        })
        .collect();
    stats.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));
    stats
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryStats {
    pub country: String,
    pub total_duration: TimeDelta,
    pub times_watched: usize,
}

fn country_stats<'a>(rows: impl Iterator<Item = (&'a str, TimeDelta)>) -> Vec<CountryStats> {
    let mut totals: BTreeMap<&str, (TimeDelta, usize)> = BTreeMap::new();
    for (country, duration) in rows {
        let entry = totals.entry(country).or_insert((TimeDelta::zero(), 0));
        entry.0 += duration;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(country, (total_duration, times_watched))| CountryStats {
            country: country.to_string(),
            total_duration,
            times_watched,
        })
        .collect()
}

/// Watching time per country the sessions were streamed from, by name.
pub fn country_breakdown(events: &[ViewEvent]) -> Vec<CountryStats> {
    country_stats(
        events
            .iter()
            .map(|event| (event.country.as_str(), event.duration)),
    )
}

/// Watching time per production country of the watched titles, by name.
pub fn origin_country_breakdown(events: &[EnrichedViewEvent]) -> Vec<CountryStats> {
    country_stats(
        events
            .iter()
            .map(|row| (row.title.origin_country.as_str(), row.event.duration)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::{enriched_rows, sample_events};

    #[test]
    fn test_same_day_restarts_count_once() {
        let stats = most_watched_titles(&sample_events(), false);
        let hook = stats.iter().find(|s| s.title == "Hook").unwrap();
        // two starts on 2021-03-14, one on 2021-03-15
        assert_eq!(hook.times_watched, 2);
        assert_eq!(hook.total_duration, TimeDelta::minutes(60 + 40));
    }

    #[test]
    fn test_grouping_episodes_by_series() {
        let stats = most_watched_titles(&sample_events(), true);
        assert_eq!(stats[0].title, "Brooklyn Nine-Nine");
        assert_eq!(stats[0].times_watched, 2);
        assert_eq!(stats[0].total_duration, TimeDelta::minutes(150));

        let ungrouped = most_watched_titles(&sample_events(), false);
        assert!(ungrouped.iter().all(|s| s.title != "Brooklyn Nine-Nine"));
    }

    #[test]
    fn test_ranked_by_duration() {
        let stats = most_watched_titles(&sample_events(), true);
        assert!(stats
            .windows(2)
            .all(|pair| pair[0].total_duration >= pair[1].total_duration));
    }

    #[test]
    fn test_country_breakdowns() {
        let streamed = country_breakdown(&sample_events());
        let names: Vec<&str> = streamed.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["CZ (Czech Republic)", "DE (Germany)"]);
        assert_eq!(streamed[1].times_watched, 1);

        let origin = origin_country_breakdown(&enriched_rows());
        assert_eq!(origin.len(), 1);
        assert_eq!(origin[0].country, "USA");
        assert_eq!(origin[0].times_watched, enriched_rows().len());
    }
}
