//! Aggregations over viewing events and their enriched counterparts.

pub mod export;
pub mod habits;
pub mod metadata;
pub mod report;
pub mod summary;
pub mod titles;

pub use export::{ExportConfig, ExportError, ExportFormat, ExportManager, SortOrder};
pub use habits::{
    daily_timeline, hourly_distribution, hourly_minutes, month_breakdown, weekday_breakdown,
    HourBucket, TimeBucket,
};
pub use metadata::{
    actor_counts, genre_by_release_year, genre_by_watch_year, genres, rating_by_watch_year,
    rating_table, rating_timeline, release_year_counts, top_genre_by_year, ActorCount,
    DateRating, TitleRating, YearBasis, YearCount, YearRating,
};
pub use report::ProfileReport;
pub use summary::{
    family_rank, format_duration, profile_events, profile_names, require_profile, total_duration,
    WatchSummary,
};
pub use titles::{
    country_breakdown, most_watched_titles, origin_country_breakdown, CountryStats,
    TitleWatchStats,
};

#[cfg(test)]
pub(crate) mod tests {
    use chrono::TimeDelta;

    use crate::enrichment::{merge_enriched, EnrichedTitle, EnrichedViewEvent};
    use crate::io::{parse_start_time, ViewEvent};

    fn event(start: &str, minutes: i64, title: &str, country: &str) -> ViewEvent {
        ViewEvent {
            profile_name: "Daniel".to_string(),
            start_time: parse_start_time(start).unwrap(),
            duration: TimeDelta::minutes(minutes),
            title: title.to_string(),
            country: country.to_string(),
        }
    }

    pub(crate) fn sample_events() -> Vec<ViewEvent> {
        let cz = "CZ (Czech Republic)";
        vec![
            event("2021-03-14 20:00:00", 60, "Hook", cz),
            event("2021-03-14 22:00:00", 30, "Hook", cz),
            event("2021-03-15 21:00:00", 40, "Hook", cz),
            event(
                "2021-03-15 18:00:00",
                70,
                "Brooklyn Nine-Nine: Season 3: The Funeral (Episode 5)",
                cz,
            ),
            event(
                "2021-03-16 18:00:00",
                80,
                "Brooklyn Nine-Nine: Season 3: Into the Woods (Episode 6)",
                "DE (Germany)",
            ),
            event("2022-01-10 20:00:00", 140, "The Shawshank Redemption", cz),
        ]
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    pub(crate) fn enriched_titles() -> Vec<EnrichedTitle> {
        vec![
            EnrichedTitle {
                split_title: "Hook".to_string(),
                is_series: false,
                year_start: 1991,
                year_end: 1991,
                genres: strings(&["Dobrodružný", "Fantasy", "Rodinný"]),
                origin_country: "USA".to_string(),
                cast: strings(&["Robin Williams", "Dustin Hoffman", "Julia Roberts"]),
                rating: 71,
            },
            EnrichedTitle {
                split_title: "Brooklyn Nine-Nine".to_string(),
                is_series: true,
                year_start: 2013,
                year_end: 2021,
                genres: strings(&["Komedie", "Krimi"]),
                origin_country: "USA".to_string(),
                cast: strings(&["Andy Samberg", "Andre Braugher"]),
                rating: 83,
            },
            EnrichedTitle {
                split_title: "The Shawshank Redemption".to_string(),
                is_series: false,
                year_start: 1994,
                year_end: 1994,
                genres: strings(&["Drama", "Krimi"]),
                origin_country: "USA".to_string(),
                cast: strings(&["Tim Robbins", "Morgan Freeman"]),
                rating: 95,
            },
        ]
    }

    pub(crate) fn enriched_rows() -> Vec<EnrichedViewEvent> {
        merge_enriched(&sample_events(), &enriched_titles())
    }
}
