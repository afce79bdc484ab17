//! Search filters, sort orders and results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use tracker_graphql::PagedResults;

use crate::capabilities::SearchProviding;
use crate::connector::AniListConnector;
use crate::error::AniListResult;
use crate::filters::{self, FilterId, FilterSelection, encode_genre_id, encode_tag_id};
use crate::normalize::DisplayItem;
use crate::queries::{EmptyVariables, GenresQuery, TagsQuery};
use crate::types::{
    CountryCode, GenreCollectionData, MediaFormat, MediaSort, MediaSourceMaterial, MediaStatus,
    TagCollectionData,
};

/// Store key of the cached genre collection.
pub const GENRES_KEY: &str = "genres";
/// Store key of the cached tag collection.
pub const TAGS_KEY: &str = "tags";
/// Store key of the time, in epoch seconds, the filter metadata was fetched.
pub const FILTERS_DATE_KEY: &str = "search-filters-query-date";

/// One choosable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub value: String,
}

impl FilterOption {
    fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// UI control of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterControl {
    #[serde(rename_all = "camelCase")]
    Multiselect {
        options: Vec<FilterOption>,
        allow_exclusion: bool,
    },
    Dropdown {
        options: Vec<FilterOption>,
    },
    Input {
        placeholder: String,
    },
}

/// A filter as rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub control: FilterControl,
}

impl FilterDescriptor {
    fn new(id: FilterId, title: &str, control: FilterControl) -> Self {
        Self {
            id: id.as_str().to_string(),
            title: title.to_string(),
            control,
        }
    }
}

/// A sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingOption {
    pub id: String,
    pub label: String,
}

/// Search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text matched against titles.
    pub title: Option<String>,
    /// Filter selections, at most one per filter.
    pub filters: Vec<(FilterId, FilterSelection)>,
}

fn enum_options<T: Copy>(
    values: &[T],
    id: impl Fn(T) -> &'static str,
    label: impl Fn(T) -> &'static str,
) -> Vec<FilterOption> {
    values
        .iter()
        .map(|value| FilterOption::new(id(*value), label(*value)))
        .collect()
}

fn multiselect(options: Vec<FilterOption>, allow_exclusion: bool) -> FilterControl {
    FilterControl::Multiselect {
        options,
        allow_exclusion,
    }
}

fn range_input(what: &str) -> FilterControl {
    FilterControl::Input {
        placeholder: format!("Give two {what} separated by a \"-\" to give a range"),
    }
}

/// Build the filter list from genre and tag metadata.
#[must_use]
pub fn filter_descriptors(
    genres: &GenreCollectionData,
    tags: &TagCollectionData,
) -> Vec<FilterDescriptor> {
    let genre_options = genres
        .genres
        .iter()
        .map(|genre| FilterOption::new(encode_genre_id(genre), genre.as_str()))
        .collect();
    let tag_options = tags
        .tags
        .iter()
        .map(|tag| FilterOption::new(encode_tag_id(&tag.name), tag.name.as_str()))
        .collect();

    vec![
        FilterDescriptor::new(FilterId::Genres, "Genres", multiselect(genre_options, true)),
        FilterDescriptor::new(
            FilterId::Formats,
            "Formats",
            multiselect(
                enum_options(MediaFormat::ALL, MediaFormat::id, MediaFormat::label),
                true,
            ),
        ),
        FilterDescriptor::new(
            FilterId::PublishingStatuses,
            "Publishing Statuses",
            multiselect(
                enum_options(MediaStatus::ALL, MediaStatus::id, MediaStatus::label),
                true,
            ),
        ),
        FilterDescriptor::new(
            FilterId::CountryOfOrigin,
            "Country of Origin",
            FilterControl::Dropdown {
                options: enum_options(CountryCode::ALL, CountryCode::id, CountryCode::label),
            },
        ),
        FilterDescriptor::new(
            FilterId::SourceMaterials,
            "Source Materials",
            multiselect(
                enum_options(
                    MediaSourceMaterial::ALL,
                    MediaSourceMaterial::id,
                    MediaSourceMaterial::label,
                ),
                false,
            ),
        ),
        FilterDescriptor::new(FilterId::StartYears, "Start Years", range_input("years")),
        FilterDescriptor::new(
            FilterId::ChapterCounts,
            "Chapter Counts",
            range_input("chapter counts"),
        ),
        FilterDescriptor::new(
            FilterId::VolumeCounts,
            "Volume Counts",
            range_input("volume counts"),
        ),
        FilterDescriptor::new(
            FilterId::Adult,
            "Adult",
            multiselect(vec![FilterOption::new("adult", "Adult")], true),
        ),
        FilterDescriptor::new(
            FilterId::Doujin,
            "Doujin",
            multiselect(vec![FilterOption::new("doujin", "Doujin")], true),
        ),
        FilterDescriptor::new(
            FilterId::TrackedTitles,
            "Tracked Titles",
            multiselect(
                vec![FilterOption::new("tracked-titles", "Tracked Titles")],
                true,
            ),
        ),
        FilterDescriptor::new(FilterId::Tags, "Tags", multiselect(tag_options, true)),
    ]
}

impl AniListConnector {
    /// Cached genre and tag metadata, refetched once the cache is stale.
    async fn filter_metadata(&self) -> AniListResult<(GenreCollectionData, TagCollectionData)> {
        let store = self.store();
        let now = self.client().clock().now();
        let fetched_at = store
            .get(FILTERS_DATE_KEY)
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0);

        if fetched_at + self.config().filter_cache_ttl.as_secs_f64() > now {
            let cached = store
                .get(GENRES_KEY)
                .zip(store.get(TAGS_KEY))
                .and_then(|(genres, tags)| {
                    Some((
                        serde_json::from_str(&genres).ok()?,
                        serde_json::from_str(&tags).ok()?,
                    ))
                });
            if let Some(metadata) = cached {
                debug!("using cached filter metadata");
                return Ok(metadata);
            }
        }

        let genres = self.client().execute::<GenresQuery>(&EmptyVariables {}).await?;
        let tags = self.client().execute::<TagsQuery>(&EmptyVariables {}).await?;

        store.set(GENRES_KEY, Some(serde_json::to_string(&genres)?));
        store.set(TAGS_KEY, Some(serde_json::to_string(&tags)?));
        store.set(FILTERS_DATE_KEY, Some(now.to_string()));
        debug!(
            genres = genres.genres.len(),
            tags = tags.tags.len(),
            "refreshed filter metadata"
        );

        Ok((genres, tags))
    }
}

#[async_trait]
impl SearchProviding for AniListConnector {
    async fn search_filters(&self) -> AniListResult<Vec<FilterDescriptor>> {
        let (genres, tags) = self.filter_metadata().await?;
        Ok(filter_descriptors(&genres, &tags))
    }

    fn sorting_options(&self) -> Vec<SortingOption> {
        MediaSort::ALL
            .iter()
            .map(|sort| SortingOption {
                id: sort.id().to_string(),
                label: sort.label().to_string(),
            })
            .collect()
    }

    #[instrument(skip(self, query), fields(filters = query.filters.len()))]
    async fn search_results(
        &self,
        query: &SearchQuery,
        page: Option<u32>,
        sort: Option<MediaSort>,
    ) -> AniListResult<PagedResults<DisplayItem>> {
        let compiled = filters::compile(&query.filters);
        let mut variables = compiled.variables;
        variables.search = query.title.clone().filter(|title| !title.is_empty());
        variables.sort = sort.map(|sort| vec![sort]);

        Ok(self
            .pages()
            .fetch_page(&variables, compiled.needs_auth, page)
            .await?)
    }
}
