pub mod client; // HTTP client and pacing
pub mod detail_page; // detail page field extraction
pub mod markup; // tag-level HTML lookup
pub mod matcher; // search candidate selection
pub mod search_page; // search result extraction

pub use client::{CatalogError, CatalogResponse, CatalogSource, CsfdClient, Pacing, SearchQuery};
pub use detail_page::{parse_detail_page, DetailFields, DetailPageError, Origin};
pub use matcher::CandidateMatcher;
pub use search_page::{parse_search_page, DetailPath, SearchCandidate, SearchSection, TitleKind};
