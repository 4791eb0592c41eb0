//! Statistics over catalog metadata: cast, release years, genres and ratings.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::summary::round_to;
use crate::enrichment::{EnrichedViewEvent, TitleKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorCount {
    pub actor: String,
    pub times_watched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRating {
    pub title: String,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRating {
    pub year: i32,
    /// None for years without any watching
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRating {
    pub date: NaiveDate,
    pub average: f64,
}

/// Which year a genre count is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearBasis {
    /// Every year of the title's release range
    Release,
    /// The year the session took place
    Watched,
}

/// How often each cast member appeared across sessions, most frequent first.
pub fn actor_counts(rows: &[EnrichedViewEvent]) -> Vec<ActorCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        for actor in &row.title.cast {
            *counts.entry(actor.as_str()).or_default() += 1;
        }
    }

    let mut actors: Vec<ActorCount> = counts
        .into_iter()
        .map(|(actor, times_watched)| ActorCount {
            actor: actor.to_string(),
            times_watched,
        })
        .collect();
    actors.sort_by(|a, b| {
        b.times_watched
            .cmp(&a.times_watched)
            .then_with(|| a.actor.cmp(&b.actor))
    });
    actors
}

fn year_table(first: i32, last: i32) -> BTreeMap<i32, usize> {
    (first..=last).map(|year| (year, 0)).collect()
}

fn into_year_counts(table: BTreeMap<i32, usize>) -> Vec<YearCount> {
    table
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Release-year span covering every row, extended to `current_year`.
fn release_span(rows: &[EnrichedViewEvent], current_year: i32) -> Option<(i32, i32)> {
    let first = rows.iter().map(|row| row.title.year_start).min()?;
    let last = rows
        .iter()
        .map(|row| row.title.year_end)
        .max()
        .unwrap_or(first)
        .max(current_year);
    Some((first, last))
}

fn watch_span(rows: &[EnrichedViewEvent]) -> Option<(i32, i32)> {
    let years = rows.iter().map(|row| row.event.start_time.year());
    let first = years.clone().min()?;
    let last = years.max().unwrap_or(first);
    Some((first, last))
}

/// Each distinct title counts once for every year it was in production.
pub fn release_year_counts(rows: &[EnrichedViewEvent], current_year: i32) -> Vec<YearCount> {
    let Some((first, last)) = release_span(rows, current_year) else {
        return Vec::new();
    };

    let mut table = year_table(first, last);
    let mut seen: HashSet<TitleKey> = HashSet::new();
    for row in rows {
        if !seen.insert(row.title.key()) {
            continue;
        }
        for year in row.title.year_start..=row.title.year_end {
            if let Some(count) = table.get_mut(&year) {
                *count += 1;
            }
        }
    }
    into_year_counts(table)
}

/// Distinct genres in first-seen order.
pub fn genres(rows: &[EnrichedViewEvent]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in rows.iter().flat_map(|row| &row.title.genres) {
        if !genres.contains(genre) {
            genres.push(genre.clone());
        }
    }
    genres
}

/// Sessions of titles in `genre`, credited to each release year of the title.
pub fn genre_by_release_year(
    rows: &[EnrichedViewEvent],
    genre: &str,
    current_year: i32,
) -> Vec<YearCount> {
    let Some((first, last)) = release_span(rows, current_year) else {
        return Vec::new();
    };

    let mut table = year_table(first, last);
    for row in rows.iter().filter(|row| row.title.has_genre(genre)) {
        for year in row.title.year_start..=row.title.year_end {
            if let Some(count) = table.get_mut(&year) {
                *count += 1;
            }
        }
    }
    into_year_counts(table)
}

/// Sessions of titles in `genre` per year they were watched.
pub fn genre_by_watch_year(rows: &[EnrichedViewEvent], genre: &str) -> Vec<YearCount> {
    let Some((first, last)) = watch_span(rows) else {
        return Vec::new();
    };

    let mut table = year_table(first, last);
    for row in rows.iter().filter(|row| row.title.has_genre(genre)) {
        if let Some(count) = table.get_mut(&row.event.start_time.year()) {
            *count += 1;
        }
    }
    into_year_counts(table)
}

/// Most counted genre for every year with any count. Ties go to the genre
/// seen first.
pub fn top_genre_by_year(
    rows: &[EnrichedViewEvent],
    basis: YearBasis,
    current_year: i32,
) -> Vec<(i32, String)> {
    let mut best: BTreeMap<i32, (usize, String)> = BTreeMap::new();

    for genre in genres(rows) {
        let counts = match basis {
            YearBasis::Release => genre_by_release_year(rows, &genre, current_year),
            YearBasis::Watched => genre_by_watch_year(rows, &genre),
        };
        for YearCount { year, count } in counts {
            if count == 0 {
                continue;
            }
            match best.get(&year) {
                Some((top, _)) if *top >= count => {}
                _ => {
                    best.insert(year, (count, genre.clone()));
                }
            }
        }
    }

    best.into_iter()
        .map(|(year, (_, genre))| (year, genre))
        .collect()
}

/// Rating of every distinct split title, first occurrence wins.
pub fn rating_table(rows: &[EnrichedViewEvent]) -> Vec<TitleRating> {
    let mut seen: HashSet<&str> = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.title.split_title.as_str()))
        .map(|row| TitleRating {
            title: row.title.split_title.clone(),
            rating: row.title.rating,
        })
        .collect()
}

/// Mean rating of watched sessions per year, 2 decimal places.
pub fn rating_by_watch_year(rows: &[EnrichedViewEvent]) -> Vec<YearRating> {
    let Some((first, last)) = watch_span(rows) else {
        return Vec::new();
    };

    let mut sums: BTreeMap<i32, (i64, usize)> = (first..=last).map(|y| (y, (0, 0))).collect();
    for row in rows {
        if let Some(entry) = sums.get_mut(&row.event.start_time.year()) {
            entry.0 += i64::from(row.title.rating);
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(year, (sum, count))| YearRating {
            year,
            average: (count > 0).then(|| round_to(sum as f64 / count as f64, 2)),
        })
        .collect()
}

/// Mean rating of the sessions of each day, 2 decimal places.
pub fn rating_timeline(rows: &[EnrichedViewEvent]) -> Vec<DateRating> {
    let mut sums: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.event.start_time.date()).or_insert((0, 0));
        entry.0 += i64::from(row.title.rating);
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(date, (sum, count))| DateRating {
            date,
            average: round_to(sum as f64 / count as f64, 2),
        })
        .collect()
}
