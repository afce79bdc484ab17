//! AniList connector.
//!
//! Browses, searches and tracks manga on AniList over its GraphQL API:
//! - discover sections and paged search with include/exclude filters,
//! - title details,
//! - reading progress tracking for the logged in viewer,
//! - login through the OAuth implicit grant.
//!
//! [`AniListConnector`] implements every capability trait in
//! [`capabilities`]; [`host`] exposes them over a JSON line protocol.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod aggregator;
pub mod capabilities;
pub mod config;
pub mod connector;
pub mod detail;
pub mod discovery;
pub mod error;
pub mod filters;
pub mod host;
pub mod normalize;
pub mod progress;
pub mod queries;
pub mod search;
pub mod settings;
pub mod types;

pub use aggregator::PageAggregator;
pub use capabilities::{
    DiscoveryProviding, MangaProviding, ProgressProviding, SearchProviding, SettingsProviding,
};
pub use config::AniListConfig;
pub use connector::AniListConnector;
pub use error::{AniListError, AniListResult};
pub use filters::{CompiledFilters, FilterId, FilterSelection, InclusionMode, SearchVariables};
pub use normalize::{ContentRating, DisplayItem};
