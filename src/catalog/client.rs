//! HTTP access to the catalog.
//!
//! [`CatalogSource`] is the seam the enrichment pipeline talks to;
//! [`CsfdClient`] implements it over a single shared `reqwest::Client`.

use async_trait::async_trait;
use std::time::Duration;

use super::search_page::DetailPath;
use crate::config::CatalogConfig;

pub const DEFAULT_BASE_URL: &str = "https://www.csfd.cz";
pub const DEFAULT_SEARCH_PATH: &str = "/hledat/?q=";
/// Browser identification the catalog accepts without blocking.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/536.36";

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid catalog configuration: {0}")]
    Config(String),
}

/// Search query built from a title: words percent-encoded and joined by `+`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn from_title(title: &str) -> Self {
        let encoded: Vec<String> = title
            .split(' ')
            .map(|word| urlencoding::encode(word).into_owned())
            .collect();
        Self(encoded.join("+"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw catalog answer; non-success statuses are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResponse {
    pub status: u16,
    pub body: String,
}

impl CatalogResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Runs a catalog search for an already encoded query.
    async fn search(&self, query: &SearchQuery) -> Result<CatalogResponse, CatalogError>;

    /// Fetches the detail page at a site-relative path.
    async fn fetch_detail(&self, path: &DetailPath) -> Result<CatalogResponse, CatalogError>;
}

#[async_trait]
impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    async fn search(&self, query: &SearchQuery) -> Result<CatalogResponse, CatalogError> {
        (**self).search(query).await
    }

    async fn fetch_detail(&self, path: &DetailPath) -> Result<CatalogResponse, CatalogError> {
        (**self).fetch_detail(path).await
    }
}

/// Courtesy delays between catalog requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub after_search: Duration,
    pub after_detail: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_search: Duration::from_millis(750),
            after_detail: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    /// No delays, for canned sources.
    pub fn none() -> Self {
        Self {
            after_search: Duration::ZERO,
            after_detail: Duration::ZERO,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            after_search: Duration::from_millis(config.search_delay_ms),
            after_detail: Duration::from_millis(config.detail_delay_ms),
        }
    }

    pub async fn wait_after_search(&self) {
        Self::wait(self.after_search).await;
    }

    pub async fn wait_after_detail(&self) {
        Self::wait(self.after_detail).await;
    }

    async fn wait(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Catalog client for csfd.cz.
#[derive(Debug, Clone)]
pub struct CsfdClient {
    base_url: String,
    search_path: String,
    http_client: reqwest::Client,
}

impl CsfdClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.is_empty() {
            return Err(CatalogError::Config("base_url is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_path: config.search_path.clone(),
            http_client: builder.build()?,
        })
    }

    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!("{}{}{}", self.base_url, self.search_path, query)
    }

    pub fn detail_url(&self, path: &DetailPath) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, url: &str) -> Result<CatalogResponse, CatalogError> {
        tracing::debug!("🌐 GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!("❌ Failed to fetch {}: {}", url, e);
            e
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            tracing::error!("❌ Failed to read response text: {}", e);
            e
        })?;

        tracing::debug!(
            "📄 Received HTTP {} with {} chars",
            status,
            body.len()
        );
        Ok(CatalogResponse { status, body })
    }
}

#[async_trait]
impl CatalogSource for CsfdClient {
    async fn search(&self, query: &SearchQuery) -> Result<CatalogResponse, CatalogError> {
        self.get(&self.search_url(query)).await
    }

    async fn fetch_detail(&self, path: &DetailPath) -> Result<CatalogResponse, CatalogError> {
        self.get(&self.detail_url(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_joins_words_with_plus() {
        let query = SearchQuery::from_title("The Huntsman: Winter's War");
        assert_eq!(query.as_str(), "The+Huntsman%3A+Winter%27s+War");
    }

    #[test]
    fn test_search_query_encodes_non_ascii() {
        let query = SearchQuery::from_title("Ženy v běhu");
        assert_eq!(query.to_string(), "%C5%BDeny+v+b%C4%9Bhu");
    }

    #[test]
    fn test_client_urls() {
        let config = CatalogConfig {
            base_url: "https://www.csfd.cz/".to_string(),
            ..CatalogConfig::default()
        };
        let client = CsfdClient::new(&config).unwrap();
        assert_eq!(
            client.search_url(&SearchQuery::from_title("Little Women")),
            "https://www.csfd.cz/hledat/?q=Little+Women"
        );
        assert_eq!(
            client.detail_url(&DetailPath("/film/1-x/".to_string())),
            "https://www.csfd.cz/film/1-x/"
        );
    }

    #[test]
    fn test_client_rejects_empty_base_url() {
        let config = CatalogConfig {
            base_url: String::new(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            CsfdClient::new(&config),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_default_pacing() {
        let pacing = Pacing::default();
        assert_eq!(pacing.after_search, Duration::from_millis(750));
        assert_eq!(pacing.after_detail, Duration::from_secs(1));
        assert_eq!(Pacing::from_config(&CatalogConfig::default()), pacing);
    }

    #[test]
    fn test_zero_pacing_returns_immediately() {
        let started = std::time::Instant::now();
        tokio_test::block_on(async {
            let pacing = Pacing::none();
            pacing.wait_after_search().await;
            pacing.wait_after_detail().await;
        });
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_response_success_range() {
        assert!(CatalogResponse::new(200, "").is_success());
        assert!(!CatalogResponse::new(404, "").is_success());
        assert!(!CatalogResponse::new(503, "").is_success());
    }
}
