//! Parsing of saved catalog pages.

use watchlens::catalog::{
    parse_detail_page, parse_search_page, CandidateMatcher, DetailPageError, TitleKind,
};

const SEARCH_SHAWSHANK: &str = include_str!("fixtures/search_shawshank.html");
const SEARCH_BROOKLYN: &str = include_str!("fixtures/search_brooklyn.html");
const SEARCH_EMPTY: &str = include_str!("fixtures/search_empty.html");
const DETAIL_SHAWSHANK: &str = include_str!("fixtures/detail_shawshank.html");
const DETAIL_BROOKLYN: &str = include_str!("fixtures/detail_brooklyn.html");
const DETAIL_NO_ORIGIN: &str = include_str!("fixtures/detail_no_origin.html");

#[test]
fn test_search_page_ignores_script_markup() {
    let sections = parse_search_page(SEARCH_SHAWSHANK);
    let kinds: Vec<TitleKind> = sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![TitleKind::Movie, TitleKind::Series]);
    assert_eq!(sections[0].candidates.len(), 2);
    assert_eq!(sections[1].candidates.len(), 1);
}

#[test]
fn test_movie_match_uses_search_name() {
    let sections = parse_search_page(SEARCH_SHAWSHANK);
    let matcher = CandidateMatcher::new();

    let movie = matcher.find_match(&sections, "The Shawshank Redemption", false);
    assert_eq!(
        movie.map(|p| p.0.as_str()),
        Some("/film/2294-vykoupeni-z-veznice-shawshank/")
    );

    // The series section has its own candidate with the same name
    let series = matcher.find_match(&sections, "The Shawshank Redemption", true);
    assert_eq!(series.map(|p| p.0.as_str()), Some("/film/999-shawshank-serial/"));
}

#[test]
fn test_series_match_skips_movie_section() {
    let sections = parse_search_page(SEARCH_BROOKLYN);
    let matcher = CandidateMatcher::new();

    let series = matcher.find_match(&sections, "Brooklyn Nine-Nine", true);
    assert_eq!(series.map(|p| p.0.as_str()), Some("/film/336467-brooklyn-99/"));

    let movie = matcher.find_match(&sections, "Brooklyn Nine-Nine", false);
    assert_eq!(movie.map(|p| p.0.as_str()), Some("/film/1-brooklyn-movie/"));
}

#[test]
fn test_empty_search_has_no_match() {
    let sections = parse_search_page(SEARCH_EMPTY);
    assert_eq!(sections.len(), 2);
    assert!(sections.iter().all(|s| s.is_empty()));
    assert!(CandidateMatcher::new()
        .find_match(&sections, "fasdfa", false)
        .is_none());
}

#[test]
fn test_movie_detail_page() {
    let fields = parse_detail_page(DETAIL_SHAWSHANK).unwrap();
    assert_eq!(fields.rating, 95);
    assert_eq!(fields.genres, vec!["Drama", "Krimi"]);
    assert_eq!(fields.origin.country, "USA");
    assert_eq!((fields.origin.year_start, fields.origin.year_end), (1994, 1994));
    assert_eq!(
        fields.cast,
        vec![
            "Tim Robbins",
            "Morgan Freeman",
            "Bob Gunton",
            "William Sadler",
            "Clancy Brown"
        ]
    );
}

#[test]
fn test_series_detail_page() {
    let fields = parse_detail_page(DETAIL_BROOKLYN).unwrap();
    assert_eq!(fields.rating, 83);
    assert_eq!(fields.genres, vec!["Komedie", "Krimi"]);
    assert_eq!(fields.origin.country, "USA");
    assert_eq!((fields.origin.year_start, fields.origin.year_end), (2013, 2021));
    // Creators listed before the cast block are not actors
    assert_eq!(
        fields.cast,
        vec!["Andy Samberg", "Andre Braugher", "Stephanie Beatriz"]
    );
}

#[test]
fn test_detail_without_origin_fails() {
    let error = parse_detail_page(DETAIL_NO_ORIGIN).unwrap_err();
    assert!(matches!(error, DetailPageError::MissingElement { .. }), "{error:?}");
}

#[test]
fn test_parsing_is_deterministic() {
    assert_eq!(
        parse_search_page(SEARCH_SHAWSHANK),
        parse_search_page(SEARCH_SHAWSHANK)
    );
    assert_eq!(
        parse_detail_page(DETAIL_SHAWSHANK).unwrap(),
        parse_detail_page(DETAIL_SHAWSHANK).unwrap()
    );
}
