//! Title details.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::capabilities::MangaProviding;
use crate::connector::{AniListConnector, parse_id};
use crate::error::AniListResult;
use crate::normalize::{ContentRating, content_rating, status_label};
use crate::queries::{MediaIdVariables, TitleViewQuery};
use crate::settings::synonyms_enabled;
use crate::types::{MediaDetails, MediaFormat, StaffEdge};

/// A labelled tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub title: String,
}

/// A titled group of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub id: String,
    pub title: String,
    pub tags: Vec<Tag>,
}

/// Everything the host shows on a title page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaDetails {
    pub manga_id: String,
    pub primary_title: String,
    pub secondary_titles: Vec<String>,
    pub synopsis: String,
    pub thumbnail_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    /// Average score scaled to `0.0..=1.0`.
    pub rating: Option<f64>,
    pub content_rating: ContentRating,
    pub tag_groups: Vec<TagGroup>,
    pub artwork_urls: Vec<String>,
    pub share_url: String,
    pub additional_info: BTreeMap<String, String>,
}

fn markup_pattern() -> AniListResult<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = PATTERN.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r"<br>|<i>|</i>|<a.*?>|</a>")?;
    Ok(PATTERN.get_or_init(|| pattern))
}

/// Description with line breaks, italics and links stripped, followed by the
/// synonyms when there are any.
pub fn synopsis(description: Option<&str>, synonyms: &[String]) -> AniListResult<String> {
    let mut synopsis = match description {
        Some(description) if !description.is_empty() => markup_pattern()?
            .replace_all(description, "")
            .into_owned(),
        _ => "No description".to_string(),
    };
    if !synonyms.is_empty() {
        synopsis.push_str("\n\nSynonyms: ");
        synopsis.push_str(&synonyms.join(", "));
        synopsis.push_str("\n\n");
    }
    Ok(synopsis)
}

/// Resolve author and artist from staff roles.
///
/// A `Story & Art` credit names the author alone. Otherwise the first story
/// credit is the author and the first art credit is the artist.
#[must_use]
pub fn credits(staff: &[StaffEdge]) -> (Option<String>, Option<String>) {
    let mut author = None;
    let mut artist = None;
    for edge in staff {
        let name = edge.node.name.full.clone();
        let role = edge.role.as_str();
        if role.starts_with("Story & Art") {
            return (name, None);
        }
        if author.is_none() && (role.starts_with("Story") || role.starts_with("Original Story")) {
            author = name;
        } else if artist.is_none() && role.starts_with("Art") {
            artist = name;
        }
        if author.is_some() && artist.is_some() {
            break;
        }
    }
    (author, artist)
}

fn tag_id(value: &str) -> String {
    value.replace(' ', "_").to_lowercase()
}

fn details(
    manga_id: &str,
    media: MediaDetails,
    show_synonyms: bool,
    share_url_base: &str,
) -> AniListResult<MangaDetails> {
    let synopsis = synopsis(media.description.as_deref(), &media.synonyms)?;

    let mut primary_title = media.title.preferred().to_string();
    if show_synonyms && !media.title.has_english() {
        if let Some(synonym) = media.synonyms.first() {
            primary_title.push('\n');
            primary_title.push_str(synonym);
        }
    }

    let secondary_titles = media
        .title
        .present()
        .map(str::to_string)
        .chain(media.synonyms.iter().cloned())
        .collect();

    let (author, artist) = credits(&media.staff.edges);

    let genres: Vec<Tag> = media
        .genres
        .iter()
        .map(|genre| Tag {
            id: tag_id(genre),
            title: genre.clone(),
        })
        .collect();
    let tags = media
        .tags
        .iter()
        .map(|tag| Tag {
            id: tag.id.to_string(),
            title: tag.name.clone(),
        })
        .collect();

    let format = match media.format.as_deref().and_then(MediaFormat::from_id) {
        Some(MediaFormat::Manga) => MediaFormat::Manga,
        Some(MediaFormat::Novel) => MediaFormat::Novel,
        _ => MediaFormat::OneShot,
    };

    let mut artwork_urls: Vec<String> = media.cover_image.extra_large.iter().cloned().collect();
    artwork_urls.extend(media.banner_image.iter().cloned());

    Ok(MangaDetails {
        manga_id: manga_id.to_string(),
        primary_title,
        secondary_titles,
        synopsis,
        thumbnail_url: media.cover_image.extra_large,
        banner_url: media.banner_image,
        status: status_label(media.status.as_deref()).map(str::to_string),
        author,
        artist,
        rating: media.average_score.map(|score| score / 100.0),
        content_rating: content_rating(media.is_adult, &media.genres),
        tag_groups: vec![
            TagGroup {
                id: "genres".into(),
                title: "Genres".into(),
                tags: genres,
            },
            TagGroup {
                id: "tags".into(),
                title: "Tags".into(),
                tags,
            },
        ],
        artwork_urls,
        share_url: format!("{share_url_base}{manga_id}"),
        additional_info: BTreeMap::from([("Format".to_string(), format.label().to_string())]),
    })
}

#[async_trait]
impl MangaProviding for AniListConnector {
    #[instrument(skip(self))]
    async fn manga_details(&self, manga_id: &str) -> AniListResult<MangaDetails> {
        let id = parse_id(manga_id)?;
        let data = self
            .client()
            .execute::<TitleViewQuery>(&MediaIdVariables { id })
            .await?;

        details(
            &id.to_string(),
            data.media,
            synonyms_enabled(self.store()),
            &self.config().share_url_base,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use tracker_auth::{MemorySessionStore, SessionStore, SystemClock};
    use tracker_testkit::ScriptedTransport;

    use crate::config::AniListConfig;
    use crate::settings::SYNONYMS_KEY;

    fn edge(name: &str, role: &str) -> StaffEdge {
        serde_json::from_value(json!({"node": {"name": {"full": name}}, "role": role})).unwrap()
    }

    fn title_view() -> serde_json::Value {
        json!({"Media": {
            "averageScore": 86,
            "bannerImage": "https://img/banner.jpg",
            "coverImage": {"extraLarge": "https://img/xl.jpg", "large": "l", "medium": "m"},
            "description": "A <i>wandering</i> swordsman.<br><br>Read <a href=\"https://x\">more</a>.",
            "format": "MANGA",
            "genres": ["Action", "Slice of Life"],
            "id": 656,
            "isAdult": false,
            "staff": {"edges": [
                {"node": {"name": {"full": "Takehiko Inoue"}}, "role": "Story & Art"},
                {"node": {"name": {"full": "Eiji Yoshikawa"}}, "role": "Original Story"}
            ]},
            "status": "HIATUS",
            "tags": [{"id": 101, "name": "Samurai"}],
            "title": {"english": null, "native": "バガボンド", "romaji": "Vagabond"},
            "synonyms": ["Vagabundo"]
        }})
    }

    #[test]
    fn test_synopsis_strips_markup() {
        let text = synopsis(
            Some("Line<br>one <i>two</i> <a href=\"https://anilist.co\">link</a>"),
            &[],
        )
        .unwrap();
        assert_eq!(text, "Lineone two link");

        assert_eq!(synopsis(None, &[]).unwrap(), "No description");
        assert_eq!(
            synopsis(None, &["A".into(), "B".into()]).unwrap(),
            "No description\n\nSynonyms: A, B\n\n"
        );
    }

    #[test]
    fn test_credits() {
        assert_eq!(
            credits(&[edge("Inoue", "Story & Art"), edge("Other", "Art")]),
            (Some("Inoue".into()), None)
        );
        assert_eq!(
            credits(&[
                edge("Writer", "Original Story"),
                edge("Second", "Story"),
                edge("Drawer", "Art (chapters 1-3)"),
            ]),
            (Some("Writer".into()), Some("Drawer".into()))
        );
        assert_eq!(credits(&[edge("Ed", "Editing")]), (None, None));
    }

    #[tokio::test]
    async fn test_details_from_title_view() {
        let transport = ScriptedTransport::new();
        transport.push_data(title_view());
        let store = Arc::new(MemorySessionStore::new());
        store.set(SYNONYMS_KEY, Some("true".into()));
        let connector = AniListConnector::with_parts(
            AniListConfig::default(),
            Arc::new(transport.clone()),
            store,
            Arc::new(SystemClock),
        )
        .unwrap();

        let details = connector.manga_details("656").await.unwrap();

        assert_eq!(transport.request_variables(0), json!({"id": 656}));
        assert_eq!(details.primary_title, "Vagabond\nVagabundo");
        assert_eq!(
            details.secondary_titles,
            ["Vagabond", "バガボンド", "Vagabundo"]
        );
        assert_eq!(
            details.synopsis,
            "A wandering swordsman.Read more.\n\nSynonyms: Vagabundo\n\n"
        );
        assert_eq!(details.status.as_deref(), Some("Hiatus"));
        assert_eq!(details.author.as_deref(), Some("Takehiko Inoue"));
        assert_eq!(details.artist, None);
        assert_eq!(details.rating, Some(0.86));
        assert_eq!(details.content_rating, ContentRating::Everyone);
        assert_eq!(details.tag_groups[0].tags[1].id, "slice_of_life");
        assert_eq!(details.tag_groups[1].tags[0].title, "Samurai");
        assert_eq!(
            details.artwork_urls,
            ["https://img/xl.jpg", "https://img/banner.jpg"]
        );
        assert_eq!(details.share_url, "https://anilist.co/manga/656");
        assert_eq!(details.additional_info["Format"], "Manga");
    }

    #[tokio::test]
    async fn test_invalid_id_sends_nothing() {
        let transport = ScriptedTransport::new();
        let connector = AniListConnector::with_parts(
            AniListConfig::default(),
            Arc::new(transport.clone()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(SystemClock),
        )
        .unwrap();

        assert!(connector.manga_details("vagabond").await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_ecchi_genre_is_mature() {
        let mut view = title_view();
        view["Media"]["genres"] = json!(["Ecchi"]);
        view["Media"]["format"] = json!("NOVEL");
        view["Media"]["averageScore"] = json!(null);
        let media: MediaDetails = serde_json::from_value(view["Media"].clone()).unwrap();

        let details = details("656", media, false, "https://anilist.co/manga/").unwrap();
        assert_eq!(details.content_rating, ContentRating::Mature);
        assert_eq!(details.additional_info["Format"], "Novel");
        assert_eq!(details.rating, None);
        assert_eq!(details.primary_title, "Vagabond");
    }
}
