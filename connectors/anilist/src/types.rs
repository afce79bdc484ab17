//! AniList API types.

use serde::{Deserialize, Deserializer, Serialize};

/// Declares a remote enum whose wire form is its id, with a display label.
macro_rules! remote_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($id:literal, $label:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire id.
            #[must_use]
            pub const fn id(self) -> &'static str {
                match self {
                    $(Self::$variant => $id,)+
                }
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Look up a value by wire id.
            #[must_use]
            pub fn from_id(id: &str) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

remote_enum! {
    /// Country a title originates from.
    pub enum CountryCode {
        Jp => ("JP", "Japan"),
        Kr => ("KR", "South Korea"),
        Cn => ("CN", "China"),
        Tw => ("TW", "Taiwan"),
    }
}

remote_enum! {
    /// Publication format.
    pub enum MediaFormat {
        Manga => ("MANGA", "Manga"),
        Novel => ("NOVEL", "Novel"),
        OneShot => ("ONE_SHOT", "One Shot"),
    }
}

remote_enum! {
    /// Publishing status.
    pub enum MediaStatus {
        Finished => ("FINISHED", "Finished"),
        Releasing => ("RELEASING", "Releasing"),
        NotYetReleased => ("NOT_YET_RELEASED", "Not Yet Released"),
        Cancelled => ("CANCELLED", "Cancelled"),
        Hiatus => ("HIATUS", "Hiatus"),
    }
}

remote_enum! {
    /// Result ordering.
    pub enum MediaSort {
        SearchMatch => ("SEARCH_MATCH", "Search Match"),
        Id => ("ID", "Id ↑"),
        IdDesc => ("ID_DESC", "Id ↓"),
        TitleRomaji => ("TITLE_ROMAJI", "Title Romaji ↑"),
        TitleRomajiDesc => ("TITLE_ROMAJI_DESC", "Title Romaji ↓"),
        TitleEnglish => ("TITLE_ENGLISH", "Title English ↑"),
        TitleEnglishDesc => ("TITLE_ENGLISH_DESC", "Title English ↓"),
        TitleNative => ("TITLE_NATIVE", "Title Native ↑"),
        TitleNativeDesc => ("TITLE_NATIVE_DESC", "Title Native ↓"),
        Format => ("FORMAT", "Format ↑"),
        FormatDesc => ("FORMAT_DESC", "Format ↓"),
        StartDate => ("START_DATE", "Start Date ↑"),
        StartDateDesc => ("START_DATE_DESC", "Start Date ↓"),
        EndDate => ("END_DATE", "End Date ↑"),
        EndDateDesc => ("END_DATE_DESC", "End Date ↓"),
        Score => ("SCORE", "Score ↑"),
        ScoreDesc => ("SCORE_DESC", "Score ↓"),
        Popularity => ("POPULARITY", "Popularity ↑"),
        PopularityDesc => ("POPULARITY_DESC", "Popularity ↓"),
        Trending => ("TRENDING", "Trending ↑"),
        TrendingDesc => ("TRENDING_DESC", "Trending ↓"),
        Status => ("STATUS", "Status ↑"),
        StatusDesc => ("STATUS_DESC", "Status ↓"),
        Chapters => ("CHAPTERS", "Chapters ↑"),
        ChaptersDesc => ("CHAPTERS_DESC", "Chapters ↓"),
        Volumes => ("VOLUMES", "Volumes ↑"),
        VolumesDesc => ("VOLUMES_DESC", "Volumes ↓"),
        UpdatedAt => ("UPDATED_AT", "Updated At ↑"),
        UpdatedAtDesc => ("UPDATED_AT_DESC", "Updated At ↓"),
        Favourites => ("FAVOURITES", "Favourites ↑"),
        FavouritesDesc => ("FAVOURITES_DESC", "Favourites ↓"),
    }
}

remote_enum! {
    /// Material a title was adapted from.
    pub enum MediaSourceMaterial {
        Original => ("ORIGINAL", "Original"),
        Manga => ("MANGA", "Manga"),
        LightNovel => ("LIGHT_NOVEL", "Light Novel"),
        WebNovel => ("WEB_NOVEL", "Web Novel"),
        Novel => ("NOVEL", "Novel"),
        Anime => ("ANIME", "Anime"),
        VisualNovel => ("VISUAL_NOVEL", "Visual Novel"),
        VideoGame => ("VIDEO_GAME", "Video Game"),
        Doujinshi => ("DOUJINSHI", "Doujinshi"),
        Comic => ("COMIC", "Comic"),
        LiveAction => ("LIVE_ACTION", "Live Action"),
        Game => ("GAME", "Game"),
        MultimediaProject => ("MULTIMEDIA_PROJECT", "Multimedia Project"),
        PictureBook => ("PICTURE_BOOK", "Picture Book"),
        Other => ("OTHER", "Other"),
    }
}

remote_enum! {
    /// Status of a title on the viewer's list.
    pub enum MediaListStatus {
        Current => ("CURRENT", "Reading"),
        Planning => ("PLANNING", "Planning"),
        Completed => ("COMPLETED", "Completed"),
        Dropped => ("DROPPED", "Dropped"),
        Paused => ("PAUSED", "Paused"),
        Repeating => ("REPEATING", "Rereading"),
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

/// Title in its three scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    /// English title.
    pub english: Option<String>,
    /// Romanized title.
    pub romaji: Option<String>,
    /// Native-script title.
    pub native: Option<String>,
}

impl MediaTitle {
    /// First present of english, romaji, native.
    #[must_use]
    pub fn preferred(&self) -> &str {
        self.english
            .as_deref()
            .or(self.romaji.as_deref())
            .or(self.native.as_deref())
            .unwrap_or("No Title")
    }

    /// Present titles in english, romaji, native order.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        [&self.english, &self.romaji, &self.native]
            .into_iter()
            .filter_map(Option::as_deref)
    }

    /// Whether an English title exists.
    #[must_use]
    pub fn has_english(&self) -> bool {
        self.english.as_deref().is_some_and(|title| !title.is_empty())
    }
}

/// Cover image urls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    /// Largest rendition.
    pub extra_large: Option<String>,
    /// Large rendition.
    pub large: Option<String>,
    /// Medium rendition.
    pub medium: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page query
// ─────────────────────────────────────────────────────────────────────────────

/// One title in a list page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// Title id.
    pub id: u64,
    /// Titles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: MediaTitle,
    /// Alternative titles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    /// Format id (`MANGA`, `NOVEL`, `ONE_SHOT`).
    #[serde(default)]
    pub format: Option<String>,
    /// Status id.
    #[serde(default)]
    pub status: Option<String>,
    /// Adult flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_adult: bool,
    /// Genre names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    /// Chapter count.
    #[serde(default)]
    pub chapters: Option<u32>,
    /// Volume count.
    #[serde(default)]
    pub volumes: Option<u32>,
    /// Cover image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: CoverImage,
}

/// Paging info of a list page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page exists.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,
}

/// Page container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPage {
    /// Paging info.
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    /// Records; `None` when the remote omitted the list.
    #[serde(default)]
    pub media: Option<Vec<MediaRecord>>,
}

/// Data of the list query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Page container.
    #[serde(rename = "Page", default)]
    pub page: Option<MediaPage>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Title view
// ─────────────────────────────────────────────────────────────────────────────

/// Staff member name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffName {
    /// Full name.
    pub full: Option<String>,
}

/// Staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffNode {
    /// Name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: StaffName,
}

/// Staff member with their role on the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffEdge {
    /// Staff member.
    #[serde(default, deserialize_with = "null_as_default")]
    pub node: StaffNode,
    /// Role, e.g. `Story & Art`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

/// Staff connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffConnection {
    /// Edges.
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<StaffEdge>,
}

/// Tag attached to a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTag {
    /// Tag id.
    pub id: u64,
    /// Tag name.
    pub name: String,
}

/// Full title record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetails {
    /// Average score out of 100.
    #[serde(default)]
    pub average_score: Option<f64>,
    /// Banner image url.
    #[serde(default)]
    pub banner_image: Option<String>,
    /// Cover image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: CoverImage,
    /// HTML description.
    #[serde(default)]
    pub description: Option<String>,
    /// Format id.
    #[serde(default)]
    pub format: Option<String>,
    /// Genre names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    /// Adult flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_adult: bool,
    /// Staff.
    #[serde(default, deserialize_with = "null_as_default")]
    pub staff: StaffConnection,
    /// Status id.
    #[serde(default)]
    pub status: Option<String>,
    /// Tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<MediaTag>,
    /// Titles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: MediaTitle,
    /// Alternative titles.
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
}

/// Data of the title view query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleViewData {
    /// Title record.
    #[serde(rename = "Media")]
    pub media: MediaDetails,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracking
// ─────────────────────────────────────────────────────────────────────────────

/// Partial date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    /// Year.
    pub year: Option<i32>,
    /// Month.
    pub month: Option<u32>,
    /// Day.
    pub day: Option<u32>,
}

/// The viewer's list entry for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListEntry {
    /// Entry id; `None` for an entry not yet saved.
    #[serde(default)]
    pub id: Option<u64>,
    /// List status.
    #[serde(default)]
    pub status: Option<MediaListStatus>,
    /// Score in the viewer's score format.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    /// Chapters read.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: u32,
    /// Volumes read.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress_volumes: u32,
    /// Reread count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub repeat: u32,
    /// Private entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub private: bool,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Hidden from status lists.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hidden_from_status_lists: bool,
    /// Custom list membership.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_lists: serde_json::Value,
    /// Advanced scores.
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_scores: serde_json::Value,
    /// Start date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub started_at: FuzzyDate,
    /// Completion date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed_at: FuzzyDate,
    /// Creation time, epoch seconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Last update time, epoch seconds.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Default for MediaListEntry {
    /// Entry shown for a title that is not on the viewer's list yet.
    fn default() -> Self {
        Self {
            id: None,
            status: Some(MediaListStatus::Current),
            score: 0.0,
            progress: 0,
            progress_volumes: 0,
            repeat: 0,
            private: false,
            notes: None,
            hidden_from_status_lists: false,
            custom_lists: serde_json::Value::Object(serde_json::Map::new()),
            advanced_scores: serde_json::Value::Object(serde_json::Map::new()),
            started_at: FuzzyDate::default(),
            completed_at: FuzzyDate::default(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Data of the list entry query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaListData {
    /// Entry.
    #[serde(rename = "MediaList")]
    pub media_list: MediaListEntry,
}

/// Data of the save mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntryData {
    /// Saved entry.
    #[serde(rename = "SaveMediaListEntry")]
    pub entry: MediaListEntry,
}

/// Deletion outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Whether the entry was deleted.
    pub deleted: bool,
}

/// Data of the delete mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEntryData {
    /// Outcome.
    #[serde(rename = "DeleteMediaListEntry")]
    pub result: Deleted,
}

// ─────────────────────────────────────────────────────────────────────────────
// Viewer
// ─────────────────────────────────────────────────────────────────────────────

/// Avatar urls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Large rendition.
    pub large: Option<String>,
}

/// Manga list options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaListOptions {
    /// Whether advanced scoring is on.
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_scoring_enabled: bool,
    /// Advanced scoring categories.
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_scoring: Vec<String>,
    /// Custom list names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_lists: Vec<String>,
    /// Whether completed titles are split by format.
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_completed_section_by_format: bool,
    /// List section order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_order: Vec<String>,
}

/// Media list options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListOptions {
    /// Row order.
    #[serde(default)]
    pub row_order: Option<String>,
    /// Score format, e.g. `POINT_10_DECIMAL`.
    #[serde(default)]
    pub score_format: Option<String>,
    /// Manga list options.
    #[serde(default, deserialize_with = "null_as_default")]
    pub manga_list: MangaListOptions,
}

/// Viewer display options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerOptions {
    /// Minutes within which list activity is merged.
    #[serde(default)]
    pub activity_merge_time: Option<u32>,
    /// Whether adult content is shown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_adult_content: bool,
    /// Staff name language.
    #[serde(default)]
    pub staff_name_language: Option<String>,
    /// Title language.
    #[serde(default)]
    pub title_language: Option<String>,
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    /// User id.
    pub id: u64,
    /// User name.
    pub name: String,
    /// Avatar.
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: Avatar,
    /// Account creation time, epoch seconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// List options.
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_list_options: MediaListOptions,
    /// Display options.
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: ViewerOptions,
}

/// Data of the viewer query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerData {
    /// Viewer.
    #[serde(rename = "Viewer")]
    pub viewer: Viewer,
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Data of the genre collection query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCollectionData {
    /// Genre names.
    #[serde(rename = "GenreCollection", default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
}

/// Tag known to the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInfo {
    /// Tag name.
    pub name: String,
    /// Adult tag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_adult: bool,
}

/// Data of the tag collection query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCollectionData {
    /// Tags.
    #[serde(rename = "MediaTagCollection", default, deserialize_with = "null_as_default")]
    pub tags: Vec<TagInfo>,
}
