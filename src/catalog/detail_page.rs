//! Detail page extraction.
//!
//! Rating is defaulted independently; every other field hangs off the
//! `film-info-content` block, and a missing origin or genre element aborts
//! the whole page.

use thiserror::Error;

use super::markup::{self, Element};

/// Rating used when the page shows no usable percentage.
pub const DEFAULT_RATING: i32 = 50;

/// Number of leading cast members kept.
pub const CAST_LIMIT: usize = 5;

/// Heading of the cast block in the creators list.
pub const CAST_HEADING: &str = "Hrají:";

/// Separator of a year range such as `2013–2021`.
const YEAR_RANGE_SEPARATOR: char = '–';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetailPageError {
    /// A structural element the page must contain was not found
    #[error("Missing element '{element}' on detail page")]
    MissingElement { element: &'static str },

    /// The origin line did not have the `<country>, <years>` shape
    #[error("Malformed origin '{text}': {reason}")]
    MalformedOrigin { text: String, reason: String },
}

impl DetailPageError {
    pub fn missing(element: &'static str) -> Self {
        Self::MissingElement { element }
    }

    pub fn malformed_origin(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedOrigin {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Production country and year range from the origin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub country: String,
    pub year_start: i32,
    pub year_end: i32,
}

/// Everything extracted from one detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    pub rating: i32,
    pub cast: Vec<String>,
    pub origin: Origin,
    pub genres: Vec<String>,
}

/// Extracts all fields from a detail page.
///
/// Returns an error only for structural failures; the rating falls back to
/// [`DEFAULT_RATING`] and a missing cast block yields an empty cast.
pub fn parse_detail_page(html: &str) -> Result<DetailFields, DetailPageError> {
    let document = markup::sanitize(html);

    let rating = parse_rating(
        markup::find_first(&document, "div", Some("rating-average"))
            .map(|div| div.text())
            .as_deref(),
    );

    let content = markup::find_first(&document, "div", Some("film-info-content"))
        .ok_or_else(|| DetailPageError::missing("film-info-content"))?;

    let cast = extract_cast(&content);

    let origin_text = content
        .find_first("div", Some("origin"))
        .ok_or_else(|| DetailPageError::missing("origin"))?
        .text();
    let origin = parse_origin(&origin_text)?;

    let genres_text = content
        .find_first("div", Some("genres"))
        .ok_or_else(|| DetailPageError::missing("genres"))?
        .text();
    let genres = parse_genres(&genres_text);

    Ok(DetailFields {
        rating,
        cast,
        origin,
        genres,
    })
}

/// Parses a rating such as `95%`, truncating fractions. Anything absent,
/// unparsable or outside 0..=100 becomes [`DEFAULT_RATING`].
pub fn parse_rating(text: Option<&str>) -> i32 {
    let Some(text) = text else {
        tracing::warn!("⚠️ Rating element not found, using {}", DEFAULT_RATING);
        return DEFAULT_RATING;
    };

    let cleaned: String = text.trim().chars().filter(|c| *c != '%').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if (0.0..=100.0).contains(&value) => value.trunc() as i32,
        Ok(value) => {
            tracing::warn!("⚠️ Rating {} out of range, using {}", value, DEFAULT_RATING);
            DEFAULT_RATING
        }
        Err(_) => {
            tracing::debug!("Rating '{}' is not numeric, using {}", text.trim(), DEFAULT_RATING);
            DEFAULT_RATING
        }
    }
}

/// Parses `USA, (2016)`, `USA, (2013–2021)` or `USA, 1994, 142 min`.
pub fn parse_origin(text: &str) -> Result<Origin, DetailPageError> {
    let mut segments = text.split(',');
    let country = segments.next().unwrap_or_default().trim().to_string();
    let years_segment = segments
        .next()
        .ok_or_else(|| DetailPageError::malformed_origin(text.trim(), "no year segment"))?;

    let years: String = years_segment
        .chars()
        .filter(|c| *c != '(' && *c != ')' && !c.is_whitespace())
        .collect();
    let bounds: Vec<&str> = years.split(YEAR_RANGE_SEPARATOR).collect();

    let parse_year = |value: &str| {
        value.parse::<i32>().map_err(|_| {
            DetailPageError::malformed_origin(text.trim(), format!("'{}' is not a year", value))
        })
    };
    let year_start = parse_year(bounds.first().copied().unwrap_or_default())?;
    let year_end = parse_year(bounds.last().copied().unwrap_or_default())?;

    if year_end < year_start {
        return Err(DetailPageError::malformed_origin(
            text.trim(),
            format!("year range {}–{} is reversed", year_start, year_end),
        ));
    }

    Ok(Origin {
        country,
        year_start,
        year_end,
    })
}

/// Splits `Drama / Krimi` into trimmed genre names, order and duplicates kept.
pub fn parse_genres(text: &str) -> Vec<String> {
    text.split('/')
        .map(|genre| genre.trim().to_string())
        .collect()
}

fn extract_cast(content: &Element<'_>) -> Vec<String> {
    let Some(heading) = content
        .find_all("h4", None)
        .into_iter()
        .find(|h4| h4.text().trim() == CAST_HEADING)
    else {
        return Vec::new();
    };

    let Some(block) = content.parent_of(&heading) else {
        return Vec::new();
    };

    block
        .find_all("a", None)
        .into_iter()
        .filter(|link| link.attr("href").is_some())
        .take(CAST_LIMIT)
        .map(|link| link.text().trim().to_string())
        .collect()
}
