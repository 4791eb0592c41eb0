//! Sequential enrichment of distinct titles.
//!
//! Each key runs search → match → detail fetch → parse. Every failure is
//! turned into the unresolved sentinel for that key only; the batch always
//! runs to the end.

use std::collections::HashMap;

use super::cache::EnrichmentCache;
use super::title_key::distinct_title_keys;
use super::{
    EnrichError, EnrichedTitle, EnrichedViewEvent, EnrichmentOutcome, ResolutionState, TitleKey,
};
use crate::catalog::{
    parse_detail_page, parse_search_page, CandidateMatcher, CatalogSource, Pacing, SearchQuery,
};
use crate::config::CatalogConfig;
use crate::io::ViewEvent;

/// Enriched events of one profile plus the title table they were joined with.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedView {
    pub profile_name: String,
    pub events: Vec<EnrichedViewEvent>,
    /// Resolved titles only
    pub titles: Vec<EnrichedTitle>,
    /// Sentinels of titles this run could not resolve; empty on a cache hit
    pub unresolved: Vec<EnrichedTitle>,
    pub from_cache: bool,
}

impl EnrichedView {
    /// Resolved titles followed by the unresolved sentinels.
    pub fn all_titles(&self) -> Vec<EnrichedTitle> {
        self.titles
            .iter()
            .chain(&self.unresolved)
            .cloned()
            .collect()
    }
}

pub struct EnrichmentPipeline<C> {
    source: C,
    matcher: CandidateMatcher,
    pacing: Pacing,
}

impl<C: CatalogSource> EnrichmentPipeline<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            matcher: CandidateMatcher::new(),
            pacing: Pacing::default(),
        }
    }

    pub fn from_config(source: C, config: &CatalogConfig) -> Self {
        Self {
            source,
            matcher: CandidateMatcher::new().with_scan_all_sections(config.match_all_sections),
            pacing: Pacing::from_config(config),
        }
    }

    pub fn with_matcher(mut self, matcher: CandidateMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// Enriches one key. Never fails: problems end in the unresolved sentinel
    /// with the terminal state recorded.
    pub async fn enrich_title(&self, key: &TitleKey) -> EnrichmentOutcome {
        match self.resolve(key).await {
            Ok(title) => {
                tracing::info!(
                    "✅ Enriched '{}' ({}–{}, rating {})",
                    key.split_title,
                    title.year_start,
                    title.year_end,
                    title.rating
                );
                EnrichmentOutcome {
                    title,
                    state: ResolutionState::Parsed,
                }
            }
            Err(EnrichError::NoMatch { .. }) => {
                tracing::info!("❔ No catalog match for '{}'", key.split_title);
                EnrichmentOutcome {
                    title: EnrichedTitle::unresolved(key),
                    state: ResolutionState::Unmatched,
                }
            }
            Err(error) => {
                tracing::warn!("⚠️ Enrichment of '{}' failed: {}", key.split_title, error);
                EnrichmentOutcome {
                    title: EnrichedTitle::unresolved(key),
                    state: ResolutionState::Failed {
                        reason: error.to_string(),
                    },
                }
            }
        }
    }

    async fn resolve(&self, key: &TitleKey) -> Result<EnrichedTitle, EnrichError> {
        let query = SearchQuery::from_title(&key.split_title);
        let search = self.source.search(&query).await;
        self.pacing.wait_after_search().await;

        let search = search?;
        if !search.is_success() {
            return Err(EnrichError::HttpStatus {
                stage: "search",
                status: search.status,
            });
        }

        let sections = parse_search_page(&search.body);
        let path = self
            .matcher
            .find_match(&sections, &key.split_title, key.is_series)
            .ok_or_else(|| EnrichError::NoMatch {
                title: key.split_title.clone(),
            })?;

        let detail = self.source.fetch_detail(path).await;
        self.pacing.wait_after_detail().await;

        let detail = detail?;
        if !detail.is_success() {
            return Err(EnrichError::HttpStatus {
                stage: "detail",
                status: detail.status,
            });
        }

        let fields = parse_detail_page(&detail.body)?;
        Ok(EnrichedTitle::from_fields(key, fields))
    }

    /// Enriches every key in order, one at a time.
    pub async fn enrich_titles(&self, keys: &[TitleKey]) -> Vec<EnrichmentOutcome> {
        tracing::info!("🎬 Enriching {} distinct titles", keys.len());

        let mut outcomes = Vec::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            tracing::debug!(
                "[{}/{}] {} '{}'",
                index + 1,
                keys.len(),
                if key.is_series { "series" } else { "movie" },
                key.split_title
            );
            outcomes.push(self.enrich_title(key).await);
        }

        let resolved = outcomes.iter().filter(|o| o.is_resolved()).count();
        tracing::info!(
            "📊 Enrichment finished: {} resolved, {} unresolved",
            resolved,
            outcomes.len() - resolved
        );
        outcomes
    }

    /// Enriched view of one profile, served from `cache` when it holds the
    /// profile and scraped (then stored) otherwise.
    pub async fn enrich_profile(
        &self,
        events: &[ViewEvent],
        profile_name: &str,
        cache: &dyn EnrichmentCache,
    ) -> EnrichedView {
        let profile_events: Vec<ViewEvent> = events
            .iter()
            .filter(|event| event.profile_name == profile_name)
            .cloned()
            .collect();

        match cache.get(profile_name) {
            Ok(Some(titles)) => {
                tracing::info!(
                    "💾 Using {} cached titles for profile '{}'",
                    titles.len(),
                    profile_name
                );
                let titles = resolved_titles(titles);
                return EnrichedView {
                    profile_name: profile_name.to_string(),
                    events: merge_enriched(&profile_events, &titles),
                    titles,
                    unresolved: Vec::new(),
                    from_cache: true,
                };
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("⚠️ Cache lookup for '{}' failed: {}", profile_name, e),
        }

        let keys = distinct_title_keys(&profile_events, profile_name);
        let outcomes = self.enrich_titles(&keys).await;
        let (titles, unresolved): (Vec<_>, Vec<_>) = outcomes
            .into_iter()
            .map(|outcome| outcome.title)
            .partition(EnrichedTitle::is_resolved);

        if let Err(e) = cache.put(profile_name, &titles) {
            tracing::warn!("⚠️ Failed to cache titles for '{}': {}", profile_name, e);
        }

        EnrichedView {
            profile_name: profile_name.to_string(),
            events: merge_enriched(&profile_events, &titles),
            titles,
            unresolved,
            from_cache: false,
        }
    }
}

/// Drops unresolved titles.
pub fn resolved_titles(titles: impl IntoIterator<Item = EnrichedTitle>) -> Vec<EnrichedTitle> {
    titles
        .into_iter()
        .filter(EnrichedTitle::is_resolved)
        .collect()
}

/// Inner join of events and resolved titles on the title key. Each event
/// appears at most once; events of unresolved keys are left out.
pub fn merge_enriched(events: &[ViewEvent], titles: &[EnrichedTitle]) -> Vec<EnrichedViewEvent> {
    let by_key: HashMap<TitleKey, &EnrichedTitle> = titles
        .iter()
        .filter(|title| title.is_resolved())
        .map(|title| (title.key(), title))
        .collect();

    events
        .iter()
        .filter_map(|event| {
            let key = TitleKey::from_raw_title(&event.title);
            by_key.get(&key).map(|title| EnrichedViewEvent {
                event: event.clone(),
                title: (*title).clone(),
            })
        })
        .collect()
}
