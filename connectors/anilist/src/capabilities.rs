//! Capability interfaces the connector implements.
//!
//! Each trait is one feature area the host can call into. A single
//! [`AniListConnector`](crate::AniListConnector) implements all of them.

use async_trait::async_trait;
use tracker_auth::Claims;
use tracker_graphql::PagedResults;

use crate::detail::MangaDetails;
use crate::discovery::DiscoverSection;
use crate::error::AniListResult;
use crate::normalize::DisplayItem;
use crate::progress::{ChapterReadAction, MangaProgress, ProgressUpdate, ReadActionOutcome};
use crate::search::{FilterDescriptor, SearchQuery, SortingOption};
use crate::types::{MediaListEntry, MediaSort, Viewer};

/// Curated home sections.
#[async_trait]
pub trait DiscoveryProviding: Send + Sync {
    /// Sections in display order.
    fn discover_sections(&self) -> Vec<DiscoverSection>;

    /// One page of a section.
    async fn discover_section_items(
        &self,
        section_id: &str,
        page: Option<u32>,
    ) -> AniListResult<PagedResults<DisplayItem>>;
}

/// Title search.
#[async_trait]
pub trait SearchProviding: Send + Sync {
    /// Filters the host should render.
    async fn search_filters(&self) -> AniListResult<Vec<FilterDescriptor>>;

    /// Sort orders the host may offer.
    fn sorting_options(&self) -> Vec<SortingOption>;

    /// One page of results.
    async fn search_results(
        &self,
        query: &SearchQuery,
        page: Option<u32>,
        sort: Option<MediaSort>,
    ) -> AniListResult<PagedResults<DisplayItem>>;
}

/// Title details.
#[async_trait]
pub trait MangaProviding: Send + Sync {
    async fn manga_details(&self, manga_id: &str) -> AniListResult<MangaDetails>;
}

/// Reading progress tracking.
#[async_trait]
pub trait ProgressProviding: Send + Sync {
    /// Progress summary, or `None` when the title is not on the viewer's list.
    async fn manga_progress(&self, manga_id: &str) -> AniListResult<Option<MangaProgress>>;

    /// Existing list entry, or a fresh one for titles not on the list.
    async fn progress_entry(&self, manga_id: &str) -> AniListResult<MediaListEntry>;

    /// Create or update the viewer's entry.
    async fn save_progress(
        &self,
        manga_id: &str,
        update: &ProgressUpdate,
    ) -> AniListResult<MediaListEntry>;

    /// Remove a list entry by its entry id.
    async fn delete_progress(&self, list_entry_id: &str) -> AniListResult<bool>;

    /// Sync chapters read in the host.
    async fn process_read_actions(
        &self,
        actions: &[ChapterReadAction],
    ) -> AniListResult<ReadActionOutcome>;
}

/// Account and preference settings.
#[async_trait]
pub trait SettingsProviding: Send + Sync {
    /// Store an access token and cache the viewer's list options.
    async fn login(&self, access_token: &str) -> AniListResult<Viewer>;

    /// Clear the session and everything derived from it.
    fn logout(&self);

    /// Profile of the logged in viewer.
    async fn viewer_profile(&self) -> AniListResult<Viewer>;

    /// Claims of the stored token.
    fn session_claims(&self) -> AniListResult<Claims>;

    /// Whether list titles show a synonym.
    fn show_synonyms(&self) -> bool;

    /// Toggle synonyms in list titles.
    fn set_show_synonyms(&self, enabled: bool);

    /// OAuth authorize URL to start a login.
    fn login_url(&self) -> AniListResult<String>;
}
