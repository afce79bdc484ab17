//! Discover sections.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tracker_graphql::PagedResults;

use crate::capabilities::DiscoveryProviding;
use crate::connector::AniListConnector;
use crate::error::{AniListError, AniListResult};
use crate::filters::SearchVariables;
use crate::normalize::DisplayItem;
use crate::types::{CountryCode, MediaSort};

/// How the host lays out a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionStyle {
    Featured,
    ProminentCarousel,
    SimpleCarousel,
}

/// A curated list on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverSection {
    pub id: String,
    pub title: String,
    pub style: SectionStyle,
}

struct SectionSpec {
    id: &'static str,
    title: &'static str,
    style: SectionStyle,
    sort: MediaSort,
    country: Option<CountryCode>,
}

static SECTIONS: [SectionSpec; 5] = [
    SectionSpec {
        id: "trending-now",
        title: "Trending Now",
        style: SectionStyle::Featured,
        sort: MediaSort::TrendingDesc,
        country: None,
    },
    SectionSpec {
        id: "all-time-popular",
        title: "All Time Popular",
        style: SectionStyle::ProminentCarousel,
        sort: MediaSort::PopularityDesc,
        country: None,
    },
    SectionSpec {
        id: "popular-manga",
        title: "Popular Manga",
        style: SectionStyle::SimpleCarousel,
        sort: MediaSort::PopularityDesc,
        country: Some(CountryCode::Jp),
    },
    SectionSpec {
        id: "popular-manhwa",
        title: "Popular Manhwa",
        style: SectionStyle::SimpleCarousel,
        sort: MediaSort::PopularityDesc,
        country: Some(CountryCode::Kr),
    },
    SectionSpec {
        id: "top-100-manga",
        title: "Top 100 Manga",
        style: SectionStyle::ProminentCarousel,
        sort: MediaSort::ScoreDesc,
        country: None,
    },
];

impl SectionSpec {
    fn variables(&self) -> SearchVariables {
        SearchVariables {
            sort: Some(vec![self.sort]),
            country_of_origin: self.country,
            ..SearchVariables::default()
        }
    }
}

#[async_trait]
impl DiscoveryProviding for AniListConnector {
    fn discover_sections(&self) -> Vec<DiscoverSection> {
        SECTIONS
            .iter()
            .map(|section| DiscoverSection {
                id: section.id.to_string(),
                title: section.title.to_string(),
                style: section.style,
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn discover_section_items(
        &self,
        section_id: &str,
        page: Option<u32>,
    ) -> AniListResult<PagedResults<DisplayItem>> {
        let section = SECTIONS
            .iter()
            .find(|section| section.id == section_id)
            .ok_or_else(|| AniListError::UnknownSection(section_id.to_string()))?;

        Ok(self
            .pages()
            .fetch_page(&section.variables(), false, page)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tracker_auth::{MemorySessionStore, SystemClock};
    use tracker_testkit::{ScriptedTransport, fixtures};

    use crate::config::AniListConfig;

    fn connector(transport: &ScriptedTransport) -> AniListConnector {
        AniListConnector::with_parts(
            AniListConfig::default(),
            Arc::new(transport.clone()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(SystemClock),
        )
        .unwrap()
    }

    #[test]
    fn test_sections_in_order() {
        let connector = connector(&ScriptedTransport::new());
        let ids: Vec<String> = connector
            .discover_sections()
            .into_iter()
            .map(|section| section.id)
            .collect();
        assert_eq!(
            ids,
            [
                "trending-now",
                "all-time-popular",
                "popular-manga",
                "popular-manhwa",
                "top-100-manga"
            ]
        );
    }

    #[tokio::test]
    async fn test_manhwa_section_variables() {
        let transport = ScriptedTransport::new();
        transport.push_data(fixtures::page_data(vec![fixtures::media(1, "Solo Leveling")], true));
        let connector = connector(&transport);

        let page = connector
            .discover_section_items("popular-manhwa", Some(2))
            .await
            .unwrap();

        assert_eq!(page.next_page, Some(3));
        assert_eq!(
            transport.request_variables(0),
            json!({"page": 2, "sort": ["POPULARITY_DESC"], "countryOfOrigin": "KR"})
        );
        assert_eq!(transport.authorization(0), None);
    }

    #[tokio::test]
    async fn test_unknown_section() {
        let transport = ScriptedTransport::new();
        let connector = connector(&transport);

        let err = connector
            .discover_section_items("staff-picks", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AniListError::UnknownSection(id) if id == "staff-picks"));
        assert_eq!(transport.request_count(), 0);
    }
}
