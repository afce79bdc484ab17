//! GraphQL documents and their typed operations.

use serde::Serialize;
use tracker_graphql::GraphqlOperation;

use crate::filters::SearchVariables;
use crate::types::{
    DeleteEntryData, GenreCollectionData, MediaListData, MediaListStatus, PageData,
    SaveEntryData, TagCollectionData, TitleViewData, ViewerData,
};

/// Records requested per list page.
pub const PAGE_SIZE: u32 = 50;

/// Variables of operations that take none.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyVariables {}

/// Variables addressing one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaIdVariables {
    /// Title id.
    pub id: u64,
}

/// Variables addressing the viewer's entry for one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntryVariables {
    /// Viewer id.
    pub user_id: u64,
    /// Title id.
    pub media_id: u64,
}

/// Variables of the save mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEntryVariables {
    /// Title id.
    pub media_id: u64,
    /// List status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaListStatus>,
    /// Score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Chapters read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    /// Volumes read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_volumes: Option<u32>,
    /// Reread count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
    /// Private entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Hidden from status lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_from_status_lists: Option<bool>,
}

impl SaveEntryVariables {
    /// Variables that only name the title.
    #[must_use]
    pub const fn for_media(media_id: u64) -> Self {
        Self {
            media_id,
            status: None,
            score: None,
            progress: None,
            progress_volumes: None,
            repeat: None,
            private: None,
            notes: None,
            hidden_from_status_lists: None,
        }
    }
}

/// Variables of the delete mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryVariables {
    /// List entry id.
    pub delete_media_list_entry_id: u64,
}

/// Selection set shared by the list entry query and the save mutation.
macro_rules! list_entry_fields {
    () => {
        "advancedScores completedAt { day month year } createdAt customLists \
hiddenFromStatusLists id notes private progress progressVolumes repeat score \
startedAt { day month year } status updatedAt"
    };
}

/// Manga list page with every search argument.
pub struct MediaPageQuery;

impl GraphqlOperation for MediaPageQuery {
    type Variables = SearchVariables;
    type ResponseData = PageData;

    const QUERY: &'static str = r"query discoverSectionsAndSearchQuery(
  $page: Int
  $isAdult: Boolean
  $onList: Boolean
  $countryOfOrigin: CountryCode
  $isLicensed: Boolean
  $search: String
  $startDateGreater: FuzzyDateInt
  $startDateLesser: FuzzyDateInt
  $formatIn: [MediaFormat]
  $formatNotIn: [MediaFormat]
  $statusIn: [MediaStatus]
  $statusNotIn: [MediaStatus]
  $chaptersGreater: Int
  $chaptersLesser: Int
  $volumesGreater: Int
  $volumesLesser: Int
  $genreIn: [String]
  $genreNotIn: [String]
  $tagIn: [String]
  $tagNotIn: [String]
  $sourceIn: [MediaSource]
  $sort: [MediaSort]
) {
  Page(page: $page, perPage: 50) {
    pageInfo { hasNextPage }
    media(
      type: MANGA
      isAdult: $isAdult
      onList: $onList
      countryOfOrigin: $countryOfOrigin
      isLicensed: $isLicensed
      search: $search
      startDate_greater: $startDateGreater
      startDate_lesser: $startDateLesser
      format_in: $formatIn
      format_not_in: $formatNotIn
      status_in: $statusIn
      status_not_in: $statusNotIn
      chapters_greater: $chaptersGreater
      chapters_lesser: $chaptersLesser
      volumes_greater: $volumesGreater
      volumes_lesser: $volumesLesser
      genre_in: $genreIn
      genre_not_in: $genreNotIn
      tag_in: $tagIn
      tag_not_in: $tagNotIn
      source_in: $sourceIn
      sort: $sort
    ) {
      chapters
      coverImage { extraLarge large medium }
      format
      genres
      id
      isAdult
      status
      title { english native romaji }
      volumes
      synonyms
    }
  }
}";
    const OPERATION_NAME: &'static str = "discoverSectionsAndSearchQuery";
}

/// Full record of one title.
pub struct TitleViewQuery;

impl GraphqlOperation for TitleViewQuery {
    type Variables = MediaIdVariables;
    type ResponseData = TitleViewData;

    const QUERY: &'static str = r"query titleViewQuery($id: Int) {
  Media(id: $id) {
    averageScore
    bannerImage
    coverImage { extraLarge large medium }
    description
    format
    genres
    id
    isAdult
    staff { edges { node { name { full } } role } }
    status
    tags { id name }
    title { english native romaji }
    synonyms
  }
}";
    const OPERATION_NAME: &'static str = "titleViewQuery";
}

/// The viewer's list entry for one title.
pub struct TitleProgressQuery;

impl GraphqlOperation for TitleProgressQuery {
    type Variables = ListEntryVariables;
    type ResponseData = MediaListData;

    const QUERY: &'static str = concat!(
        "query titleProgressQuery($userId: Int, $mediaId: Int) {\n",
        "  MediaList(userId: $userId, mediaId: $mediaId) { ",
        list_entry_fields!(),
        " }\n}"
    );
    const OPERATION_NAME: &'static str = "titleProgressQuery";

    fn requires_auth() -> bool {
        true
    }
}

/// Create or update the viewer's list entry.
pub struct SaveProgressMutation;

impl GraphqlOperation for SaveProgressMutation {
    type Variables = SaveEntryVariables;
    type ResponseData = SaveEntryData;

    const QUERY: &'static str = concat!(
        "mutation saveProgressMutation(\n",
        "  $mediaId: Int\n",
        "  $status: MediaListStatus\n",
        "  $score: Float\n",
        "  $progress: Int\n",
        "  $progressVolumes: Int\n",
        "  $repeat: Int\n",
        "  $private: Boolean\n",
        "  $notes: String\n",
        "  $hiddenFromStatusLists: Boolean\n",
        ") {\n",
        "  SaveMediaListEntry(\n",
        "    mediaId: $mediaId\n",
        "    status: $status\n",
        "    score: $score\n",
        "    progress: $progress\n",
        "    progressVolumes: $progressVolumes\n",
        "    repeat: $repeat\n",
        "    private: $private\n",
        "    notes: $notes\n",
        "    hiddenFromStatusLists: $hiddenFromStatusLists\n",
        "  ) { ",
        list_entry_fields!(),
        " }\n}"
    );
    const OPERATION_NAME: &'static str = "saveProgressMutation";

    fn requires_auth() -> bool {
        true
    }
}

/// Remove a list entry.
pub struct DeleteProgressMutation;

impl GraphqlOperation for DeleteProgressMutation {
    type Variables = DeleteEntryVariables;
    type ResponseData = DeleteEntryData;

    const QUERY: &'static str = r"mutation deleteProgressMutation($deleteMediaListEntryId: Int) {
  DeleteMediaListEntry(id: $deleteMediaListEntryId) { deleted }
}";
    const OPERATION_NAME: &'static str = "deleteProgressMutation";

    fn requires_auth() -> bool {
        true
    }
}

/// The authenticated user with list options.
pub struct ViewerQuery;

impl GraphqlOperation for ViewerQuery {
    type Variables = EmptyVariables;
    type ResponseData = ViewerData;

    const QUERY: &'static str = r"query viewerQuery {
  Viewer {
    avatar { large }
    createdAt
    id
    name
    mediaListOptions {
      rowOrder
      scoreFormat
      mangaList {
        advancedScoringEnabled
        advancedScoring
        customLists
        splitCompletedSectionByFormat
        sectionOrder
      }
    }
    options {
      activityMergeTime
      disabledListActivity { disabled type }
      displayAdultContent
      staffNameLanguage
      titleLanguage
    }
  }
}";
    const OPERATION_NAME: &'static str = "viewerQuery";

    fn requires_auth() -> bool {
        true
    }
}

/// Every genre name.
pub struct GenresQuery;

impl GraphqlOperation for GenresQuery {
    type Variables = EmptyVariables;
    type ResponseData = GenreCollectionData;

    const QUERY: &'static str = "query genresQuery { GenreCollection }";
    const OPERATION_NAME: &'static str = "genresQuery";
}

/// Every tag name.
pub struct TagsQuery;

impl GraphqlOperation for TagsQuery {
    type Variables = EmptyVariables;
    type ResponseData = TagCollectionData;

    const QUERY: &'static str = "query tagsQuery { MediaTagCollection { isAdult name } }";
    const OPERATION_NAME: &'static str = "tagsQuery";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_entry_documents_share_fields() {
        assert!(TitleProgressQuery::QUERY.contains(list_entry_fields!()));
        assert!(SaveProgressMutation::QUERY.contains(list_entry_fields!()));
        assert!(TitleProgressQuery::requires_auth());
        assert!(!MediaPageQuery::requires_auth());
    }

    #[test]
    fn test_page_query_declares_page_size() {
        assert!(
            MediaPageQuery::QUERY.contains(&format!("perPage: {PAGE_SIZE}")),
            "page size drifted from the document"
        );
    }

    #[test]
    fn test_save_variables_skip_unset_fields() {
        let mut vars = SaveEntryVariables::for_media(30013);
        vars.progress = Some(12);
        vars.status = Some(MediaListStatus::Current);

        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            serde_json::json!({"mediaId": 30013, "progress": 12, "status": "CURRENT"})
        );
    }

    #[test]
    fn test_delete_variables_name() {
        let vars = DeleteEntryVariables {
            delete_media_list_entry_id: 7,
        };
        assert_eq!(
            serde_json::to_value(vars).unwrap(),
            serde_json::json!({"deleteMediaListEntryId": 7})
        );
    }
}
