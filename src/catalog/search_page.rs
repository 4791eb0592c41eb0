//! Search result page extraction.
//!
//! A search response lists movies and series in separate `section` boxes
//! (`box main-movies` / `box main-series`); each result is an
//! `article-header` with a `film-title-name` link and, for titles whose
//! localized name differs, a `search-name` paragraph holding the original
//! name in parentheses.

use serde::{Deserialize, Serialize};

use super::markup::{self, Element};

/// Kind of a catalog entry, which also selects the result section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum TitleKind {
    #[display("movie")]
    Movie,
    #[display("series")]
    Series,
}

impl TitleKind {
    pub fn from_is_series(is_series: bool) -> Self {
        if is_series {
            TitleKind::Series
        } else {
            TitleKind::Movie
        }
    }

    /// Class token of the result section listing this kind.
    pub fn section_class(&self) -> &'static str {
        match self {
            TitleKind::Movie => "main-movies",
            TitleKind::Series => "main-series",
        }
    }
}

/// Site-relative path of a title's detail page, e.g. `/film/2294-.../`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct DetailPath(pub String);

/// One result entry of a search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Text of the `film-title-name` link (localized name).
    pub title_name: String,
    /// Raw text of the `search-name` paragraph, parentheses included.
    pub search_name: Option<String>,
    pub detail_path: DetailPath,
    /// Position of the entry within its section.
    pub ordinal_index: usize,
}

/// A result section of one kind, candidates in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSection {
    pub kind: TitleKind,
    pub candidates: Vec<SearchCandidate>,
}

impl SearchSection {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Extracts all movie and series result sections in document order.
/// Sections of other kinds (people, users, ...) are skipped.
pub fn parse_search_page(html: &str) -> Vec<SearchSection> {
    let document = markup::sanitize(html);

    markup::find_all(&document, "section", Some("box"))
        .into_iter()
        .filter_map(|section| {
            let kind = section_kind(&section)?;
            let candidates = parse_candidates(&section);
            tracing::debug!(
                "🔎 Found {} section with {} candidates",
                kind,
                candidates.len()
            );
            Some(SearchSection { kind, candidates })
        })
        .collect()
}

fn section_kind(section: &Element<'_>) -> Option<TitleKind> {
    [TitleKind::Series, TitleKind::Movie]
        .into_iter()
        .find(|kind| section.has_class(kind.section_class()))
}

fn parse_candidates(section: &Element<'_>) -> Vec<SearchCandidate> {
    section
        .find_all("header", Some("article-header"))
        .into_iter()
        .enumerate()
        .filter_map(|(ordinal_index, header)| {
            let link = header.find_first("a", Some("film-title-name"))?;
            let Some(href) = link.attr("href") else {
                tracing::debug!("Skipping result #{} without a detail link", ordinal_index);
                return None;
            };
            let search_name = header
                .find_first("p", Some("search-name"))
                .map(|p| p.text());

            Some(SearchCandidate {
                title_name: link.text(),
                search_name,
                detail_path: DetailPath(href),
                ordinal_index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <section class="box main-movies">
        <header class="box-header"><h2>Filmy</h2></header>
        <div class="box-content">
            <article class="article article-poster-50">
                <header class="article-header">
                    <h3 class="film-title-nooverflow">
                        <a href="/film/2294-vykoupeni-z-veznice-shawshank/" class="film-title-name">Vykoupení z věznice Shawshank</a>
                    </h3>
                    <p class="search-name">(The Shawshank Redemption)</p>
                </header>
            </article>
            <article class="article">
                <header class="article-header">
                    <h3><a class="film-title-name" href="/film/1-dummy/">Shawshank</a></h3>
                </header>
            </article>
        </div>
    </section>
    <section class="box main-users"><header class="article-header"><a class="film-title-name" href="/u/">x</a></header></section>
    <section class="box main-series">
        <article><header class="article-header"><h3><span>no link</span></h3></header></article>
        <article><header class="article-header"><h3><a href="/film/9-s/" class="film-title-name">Seriál</a></h3></header></article>
    </section>
    "#;

    #[test]
    fn test_parse_search_page_sections_in_order() {
        let sections = parse_search_page(PAGE);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, TitleKind::Movie);
        assert_eq!(sections[1].kind, TitleKind::Series);
    }

    #[test]
    fn test_parse_candidates_fields() {
        let sections = parse_search_page(PAGE);
        let movies = &sections[0].candidates;
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title_name, "Vykoupení z věznice Shawshank");
        assert_eq!(
            movies[0].search_name.as_deref(),
            Some("(The Shawshank Redemption)")
        );
        assert_eq!(
            movies[0].detail_path,
            DetailPath("/film/2294-vykoupeni-z-veznice-shawshank/".to_string())
        );
        assert_eq!(movies[1].search_name, None);
        assert_eq!(movies[1].ordinal_index, 1);
    }

    #[test]
    fn test_candidates_without_link_are_skipped_but_keep_ordinals() {
        let sections = parse_search_page(PAGE);
        let series = &sections[1].candidates;
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].ordinal_index, 1);
        assert_eq!(series[0].title_name, "Seriál");
    }

    #[test]
    fn test_empty_page_has_no_sections() {
        assert!(parse_search_page("<html><body>Nic nenalezeno</body></html>").is_empty());
    }

    #[test]
    fn test_title_kind_display_and_section_class() {
        assert_eq!(TitleKind::from_is_series(true).to_string(), "series");
        assert_eq!(TitleKind::Movie.section_class(), "main-movies");
    }
}
