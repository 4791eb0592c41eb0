//! When a profile watches: weekday, month, calendar day and hour of day.

use chrono::{Datelike, Month, NaiveDate, TimeDelta, Timelike, Weekday};
use std::collections::BTreeMap;

use super::summary::{duration_hours, duration_minutes, round_to};
use crate::io::ViewEvent;

/// Watching time accumulated under one label.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket<K> {
    pub label: K,
    pub duration: TimeDelta,
    /// Duration in hours, 2 decimal places
    pub hours: f64,
    /// Share of the total, 1 decimal place
    pub percent: f64,
}

fn buckets<K: Clone>(totals: Vec<(K, TimeDelta)>) -> Vec<TimeBucket<K>> {
    let grand_total: f64 = totals.iter().map(|(_, d)| duration_hours(*d)).sum();

    totals
        .into_iter()
        .map(|(label, duration)| {
            let hours = duration_hours(duration);
            let percent = if grand_total > 0.0 {
                round_to(hours / grand_total * 100.0, 1)
            } else {
                0.0
            };
            TimeBucket {
                label,
                duration,
                hours: round_to(hours, 2),
                percent,
            }
        })
        .collect()
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Monday to Sunday, zero-filled.
pub fn weekday_breakdown(events: &[ViewEvent]) -> Vec<TimeBucket<Weekday>> {
    let mut totals = [TimeDelta::zero(); 7];
    for event in events {
        totals[event.start_time.weekday().num_days_from_monday() as usize] += event.duration;
    }
    buckets(WEEKDAYS.iter().copied().zip(totals).collect())
}

/// January to December, zero-filled.
pub fn month_breakdown(events: &[ViewEvent]) -> Vec<TimeBucket<Month>> {
    let mut totals = [TimeDelta::zero(); 12];
    for event in events {
        totals[event.start_time.month0() as usize] += event.duration;
    }
    buckets(MONTHS.iter().copied().zip(totals).collect())
}

/// One bucket per calendar day that has any watching, in date order.
pub fn daily_timeline(events: &[ViewEvent]) -> Vec<TimeBucket<NaiveDate>> {
    let mut totals: BTreeMap<NaiveDate, TimeDelta> = BTreeMap::new();
    for event in events {
        *totals
            .entry(event.start_time.date())
            .or_insert_with(TimeDelta::zero) += event.duration;
    }
    buckets(totals.into_iter().collect())
}

/// Minutes watched in one hour of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBucket {
    pub hour: u32,
    pub minutes: f64,
    pub percent: f64,
}

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Minutes per hour of day. A session's minutes are spread over every hour
/// it spans; sessions running past midnight continue at hour 0.
pub fn hourly_minutes(events: &[ViewEvent]) -> [f64; 24] {
    let mut table = [0.0f64; 24];

    for event in events {
        let start = event.start_time.time();
        let mut hour = start.hour() as usize;
        let offset = start.minute() as f64 + start.second() as f64 / 60.0;
        let mut remaining = duration_minutes(event.duration);

        let first = (60.0 - offset).min(remaining);
        table[hour % 24] += first;
        remaining -= first;

        // Whole days add an hour to every slot.
        let full_days = (remaining / MINUTES_PER_DAY).floor();
        if full_days > 0.0 {
            for slot in table.iter_mut() {
                *slot += full_days * 60.0;
            }
            remaining -= full_days * MINUTES_PER_DAY;
        }

        while remaining > 0.0 {
            hour += 1;
            let chunk = remaining.min(60.0);
            table[hour % 24] += chunk;
            remaining -= chunk;
        }
    }

    table
}

pub fn hourly_distribution(events: &[ViewEvent]) -> Vec<HourBucket> {
    let table = hourly_minutes(events);
    let total: f64 = table.iter().sum();

    (0u32..)
        .zip(table)
        .map(|(hour, minutes)| HourBucket {
            hour,
            minutes: round_to(minutes, 2),
            percent: if total > 0.0 {
                round_to(minutes / total * 100.0, 1)
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_start_time;

    fn event(start: &str, minutes: i64) -> ViewEvent {
        ViewEvent {
            profile_name: "Daniel".to_string(),
            start_time: parse_start_time(start).unwrap(),
            duration: TimeDelta::minutes(minutes),
            title: "Hook".to_string(),
            country: "CZ".to_string(),
        }
    }

    #[test]
    fn test_weekday_buckets_start_monday() {
        // 2021-03-15 is a Monday, 2021-03-21 a Sunday
        let events = vec![
            event("2021-03-15 20:00:00", 90),
            event("2021-03-21 20:00:00", 30),
            event("2021-03-22 20:00:00", 30),
        ];
        let weekdays = weekday_breakdown(&events);

        assert_eq!(weekdays.len(), 7);
        assert_eq!(weekdays[0].label, Weekday::Mon);
        assert_eq!(weekdays[0].duration, TimeDelta::minutes(120));
        assert_eq!(weekdays[0].hours, 2.0);
        assert_eq!(weekdays[0].percent, 80.0);
        assert_eq!(weekdays[6].label, Weekday::Sun);
        assert_eq!(weekdays[6].percent, 20.0);
        assert_eq!(weekdays[3].duration, TimeDelta::zero());
        assert_eq!(weekdays[3].percent, 0.0);
    }

    #[test]
    fn test_month_buckets() {
        let events = vec![
            event("2020-12-31 23:00:00", 40),
            event("2021-01-01 10:00:00", 20),
        ];
        let months = month_breakdown(&events);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, Month::January);
        assert_eq!(months[0].hours, 0.33);
        assert_eq!(months[0].percent, 33.3);
        assert_eq!(months[11].percent, 66.7);
    }

    #[test]
    fn test_daily_timeline_sorted_by_date() {
        let events = vec![
            event("2021-03-16 08:00:00", 60),
            event("2021-03-14 21:00:00", 30),
            event("2021-03-16 22:00:00", 30),
        ];
        let days = daily_timeline(&events);
        let labels: Vec<String> = days.iter().map(|d| d.label.to_string()).collect();
        assert_eq!(labels, vec!["2021-03-14", "2021-03-16"]);
        assert_eq!(days[1].hours, 1.5);
    }

    #[test]
    fn test_hourly_spill_over() {
        let table = hourly_minutes(&[event("2021-03-14 20:45:00", 90)]);
        assert_eq!(table[20], 15.0);
        assert_eq!(table[21], 60.0);
        assert_eq!(table[22], 15.0);
        assert_eq!(table.iter().sum::<f64>(), 90.0);
    }

    #[test]
    fn test_hourly_wraps_past_midnight() {
        let table = hourly_minutes(&[event("2021-03-14 23:30:00", 100)]);
        assert_eq!(table[23], 30.0);
        assert_eq!(table[0], 60.0);
        assert_eq!(table[1], 10.0);
    }

    #[test]
    fn test_hourly_multi_day_session() {
        // 20:45 for two days and 90 minutes
        let table = hourly_minutes(&[event("2021-03-14 20:45:00", 2 * 24 * 60 + 90)]);
        assert_eq!(table[20], 15.0 + 120.0);
        assert_eq!(table[21], 60.0 + 120.0);
        assert_eq!(table[22], 15.0 + 120.0);
        assert_eq!(table[3], 120.0);
        assert_eq!(table.iter().sum::<f64>(), (2 * 24 * 60 + 90) as f64);
    }

    #[test]
    fn test_hourly_within_one_hour() {
        let buckets = hourly_distribution(&[event("2021-03-14 08:10:00", 20)]);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[8].minutes, 20.0);
        assert_eq!(buckets[8].percent, 100.0);
        assert_eq!(buckets[9].minutes, 0.0);
    }
}
