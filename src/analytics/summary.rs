//! Headline totals for one profile and the family ranking.

use chrono::{NaiveDate, TimeDelta};
use std::collections::HashMap;

use crate::error::{WatchlensError, WatchlensResult};
use crate::io::ViewEvent;

/// Headline numbers of one profile's viewing history.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSummary {
    /// Sum of all session durations
    pub total_duration: TimeDelta,
    /// Number of sessions started
    pub session_count: usize,
    /// Mean session length in hours
    pub average_session_hours: f64,
    pub longest_session: TimeDelta,
    /// Day with the most watching and its total
    pub busiest_day: Option<(NaiveDate, TimeDelta)>,
    /// Earliest session (first in file order on ties)
    pub first_watched: Option<ViewEvent>,
}

impl WatchSummary {
    pub fn from_events(events: &[ViewEvent]) -> Self {
        let total_duration = total_duration(events);
        let session_count = events.len();
        let average_session_hours = if session_count == 0 {
            0.0
        } else {
            duration_hours(total_duration) / session_count as f64
        };

        let longest_session = events
            .iter()
            .map(|event| event.duration)
            .max()
            .unwrap_or_else(TimeDelta::zero);

        let mut per_day: HashMap<NaiveDate, TimeDelta> = HashMap::new();
        for event in events {
            *per_day
                .entry(event.start_time.date())
                .or_insert_with(TimeDelta::zero) += event.duration;
        }
        let busiest_day = per_day
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));

        let first_watched = events
            .iter()
            .enumerate()
            .min_by_key(|(index, event)| (event.start_time, *index))
            .map(|(_, event)| event.clone());

        Self {
            total_duration,
            session_count,
            average_session_hours,
            longest_session,
            busiest_day,
            first_watched,
        }
    }
}

pub fn total_duration<'a>(events: impl IntoIterator<Item = &'a ViewEvent>) -> TimeDelta {
    events
        .into_iter()
        .fold(TimeDelta::zero(), |total, event| total + event.duration)
}

/// Distinct profile names in first-seen order.
pub fn profile_names(events: &[ViewEvent]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for event in events {
        if !names.contains(&event.profile_name) {
            names.push(event.profile_name.clone());
        }
    }
    names
}

/// Events of one profile, in file order.
pub fn profile_events(events: &[ViewEvent], profile_name: &str) -> Vec<ViewEvent> {
    events
        .iter()
        .filter(|event| event.profile_name == profile_name)
        .cloned()
        .collect()
}

/// Events of one profile, failing when the export has none for it.
pub fn require_profile(events: &[ViewEvent], profile_name: &str) -> WatchlensResult<Vec<ViewEvent>> {
    let own = profile_events(events, profile_name);
    if own.is_empty() {
        return Err(WatchlensError::unknown_profile(profile_name));
    }
    Ok(own)
}

/// 1-based position of `profile_name` when profiles are ordered by total
/// watching time, longest first.
pub fn family_rank(events: &[ViewEvent], profile_name: &str) -> Option<usize> {
    let mut totals: Vec<(String, TimeDelta)> = profile_names(events)
        .into_iter()
        .map(|name| {
            let total = total_duration(events.iter().filter(|e| e.profile_name == name));
            (name, total)
        })
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    totals
        .iter()
        .position(|(name, _)| name == profile_name)
        .map(|index| index + 1)
}

pub fn duration_hours(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}

pub fn duration_minutes(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / 60.0
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Human readable duration, e.g. `2 days 03h 15m 00s` or `42m 10s`.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = total % 86_400 / 3600;
    let minutes = total % 3600 / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{} days {:02}h {:02}m {:02}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{:02}m {:02}s", minutes, seconds)
    }
}
