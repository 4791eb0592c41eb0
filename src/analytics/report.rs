//! Plain-text report of one profile.

use chrono::{Month, NaiveDate, Weekday};
use std::fmt;

use super::habits::{
    daily_timeline, hourly_distribution, month_breakdown, weekday_breakdown, HourBucket,
    TimeBucket,
};
use super::metadata::{
    actor_counts, rating_by_watch_year, release_year_counts, top_genre_by_year, ActorCount,
    YearBasis, YearCount, YearRating,
};
use super::summary::{family_rank, format_duration, profile_events, WatchSummary};
use super::titles::{
    country_breakdown, most_watched_titles, origin_country_breakdown, CountryStats,
    TitleWatchStats,
};
use crate::enrichment::EnrichedView;
use crate::io::ViewEvent;

/// Rows shown in ranked tables.
pub const TOP_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct ProfileReport {
    pub profile_name: String,
    pub family_rank: Option<usize>,
    pub family_size: usize,
    pub summary: WatchSummary,
    pub weekdays: Vec<TimeBucket<Weekday>>,
    pub months: Vec<TimeBucket<Month>>,
    pub days: Vec<TimeBucket<NaiveDate>>,
    pub hours: Vec<HourBucket>,
    pub top_titles: Vec<TitleWatchStats>,
    pub streaming_countries: Vec<CountryStats>,
    pub origin_countries: Vec<CountryStats>,
    pub top_actors: Vec<ActorCount>,
    pub release_years: Vec<YearCount>,
    pub top_genres: Vec<(i32, String)>,
    pub ratings: Vec<YearRating>,
    pub enriched_sessions: usize,
    pub resolved_titles: usize,
}

impl ProfileReport {
    /// `events` holds every profile (for the family ranking); `view` the
    /// enriched sessions of the reported profile.
    pub fn build(events: &[ViewEvent], view: &EnrichedView, current_year: i32) -> Self {
        let own = profile_events(events, &view.profile_name);
        let mut top_titles = most_watched_titles(&own, true);
        top_titles.truncate(TOP_ROWS);
        let mut top_actors = actor_counts(&view.events);
        top_actors.truncate(TOP_ROWS);

        Self {
            profile_name: view.profile_name.clone(),
            family_rank: family_rank(events, &view.profile_name),
            family_size: super::summary::profile_names(events).len(),
            summary: WatchSummary::from_events(&own),
            weekdays: weekday_breakdown(&own),
            months: month_breakdown(&own),
            days: daily_timeline(&own),
            hours: hourly_distribution(&own),
            top_titles,
            streaming_countries: country_breakdown(&own),
            origin_countries: origin_country_breakdown(&view.events),
            top_actors,
            release_years: release_year_counts(&view.events, current_year),
            top_genres: top_genre_by_year(&view.events, YearBasis::Watched, current_year),
            ratings: rating_by_watch_year(&view.events),
            enriched_sessions: view.events.len(),
            resolved_titles: view.titles.len(),
        }
    }
}

/// Plain-text rendering, one section per breakdown.
impl fmt::Display for ProfileReport {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "== {} ==", self.profile_name)?;
        if let Some(rank) = self.family_rank {
            writeln!(out, "Family position: {} of {}", rank, self.family_size)?;
        }
        writeln!(
            out,
            "Total watching time: {}",
            format_duration(self.summary.total_duration)
        )?;
        writeln!(out, "Sessions: {}", self.summary.session_count)?;
        writeln!(
            out,
            "Average session: {:.2} h",
            self.summary.average_session_hours
        )?;
        writeln!(
            out,
            "Longest session: {}",
            format_duration(self.summary.longest_session)
        )?;
        if let Some((date, duration)) = self.summary.busiest_day {
            writeln!(out, "Busiest day: {} ({})", date, format_duration(duration))?;
        }
        if let Some(first) = &self.summary.first_watched {
            writeln!(
                out,
                "First watched: {} on {} ({})",
                first.title,
                first.start_time,
                format_duration(first.duration)
            )?;
        }

        writeln!(out, "\n-- Weekdays --")?;
        for bucket in &self.weekdays {
            writeln!(out, "{:<10} {:>8.2} h {:>5.1}%", bucket.label, bucket.hours, bucket.percent)?;
        }

        writeln!(out, "\n-- Months --")?;
        for bucket in &self.months {
            writeln!(
                out,
                "{:<10} {:>8.2} h {:>5.1}%",
                bucket.label.name(),
                bucket.hours,
                bucket.percent
            )?;
        }

        writeln!(out, "\n-- Hours of day --")?;
        for bucket in self.hours.iter().filter(|b| b.minutes > 0.0) {
            writeln!(
                out,
                "{:02}:00 {:>8.1} min {:>5.1}%",
                bucket.hour, bucket.minutes, bucket.percent
            )?;
        }
        writeln!(out, "Days with watching: {}", self.days.len())?;

        writeln!(out, "\n-- Most watched --")?;
        for stats in &self.top_titles {
            writeln!(
                out,
                "{} | {} | {}x",
                stats.title,
                format_duration(stats.total_duration),
                stats.times_watched
            )?;
        }

        writeln!(out, "\n-- Streamed from --")?;
        for country in &self.streaming_countries {
            writeln!(
                out,
                "{} | {} | {}x",
                country.country,
                format_duration(country.total_duration),
                country.times_watched
            )?;
        }

        writeln!(
            out,
            "\n-- Catalog ({} titles, {} sessions) --",
            self.resolved_titles, self.enriched_sessions
        )?;
        for country in &self.origin_countries {
            writeln!(
                out,
                "Origin {} | {} | {}x",
                country.country,
                format_duration(country.total_duration),
                country.times_watched
            )?;
        }
        for actor in &self.top_actors {
            writeln!(out, "Actor {} | {}x", actor.actor, actor.times_watched)?;
        }
        for (year, genre) in &self.top_genres {
            writeln!(out, "Top genre {}: {}", year, genre)?;
        }
        for rating in &self.ratings {
            match rating.average {
                Some(average) => writeln!(out, "Rating {}: {:.2}", rating.year, average)?,
                None => writeln!(out, "Rating {}: -", rating.year)?,
            }
        }
        let busiest_release = self.release_years.iter().max_by_key(|c| c.count);
        if let Some(year) = busiest_release.filter(|c| c.count > 0) {
            writeln!(
                out,
                "Most represented release year: {} ({} titles)",
                year.year, year.count
            )?;
        }

        Ok(())
    }
}
