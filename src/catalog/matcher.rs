//! Picks the catalog entry whose name equals a viewing-history title.

use super::search_page::{DetailPath, SearchCandidate, SearchSection, TitleKind};

/// Exact-name candidate selection over search result sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateMatcher {
    scan_all_sections: bool,
}

impl CandidateMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// When disabled (the default) only the first section of the requested
    /// kind is examined, even if it holds no match.
    pub fn with_scan_all_sections(mut self, scan_all_sections: bool) -> Self {
        self.scan_all_sections = scan_all_sections;
        self
    }

    /// Detail path of the first candidate, in document order, whose derived
    /// name equals `target_title`. Sections of the other kind are ignored.
    pub fn find_match<'a>(
        &self,
        sections: &'a [SearchSection],
        target_title: &str,
        is_series: bool,
    ) -> Option<&'a DetailPath> {
        let kind = TitleKind::from_is_series(is_series);
        let mut scoped = sections.iter().filter(|section| section.kind == kind);

        if !self.scan_all_sections {
            return scoped
                .next()
                .and_then(|section| Self::match_in_section(section, target_title));
        }

        scoped.find_map(|section| Self::match_in_section(section, target_title))
    }

    fn match_in_section<'a>(section: &'a SearchSection, target_title: &str) -> Option<&'a DetailPath> {
        let found = section
            .candidates
            .iter()
            .find(|candidate| display_name(candidate, target_title) == target_title)
            .map(|candidate| &candidate.detail_path);

        match found {
            Some(path) => tracing::debug!("🎯 Matched '{}' to {}", target_title, path),
            None => tracing::debug!(
                "No {} candidate named '{}' among {}",
                section.kind,
                target_title,
                section.candidates.len()
            ),
        }
        found
    }
}

/// Comparable name of a candidate: the search name without parentheses when
/// present and equal to the target, otherwise the link title.
pub fn display_name(candidate: &SearchCandidate, target_title: &str) -> String {
    match &candidate.search_name {
        Some(search_name) => {
            let stripped: String = search_name
                .chars()
                .filter(|c| *c != '(' && *c != ')')
                .collect();
            if stripped == target_title {
                stripped
            } else {
                candidate.title_name.clone()
            }
        }
        None => candidate.title_name.clone(),
    }
}
