//! Search filter selections and their compilation into query variables.
//!
//! Host UI state arrives as untyped JSON per filter id. It is parsed once into
//! [`FilterSelection`] and compiled into [`SearchVariables`]. Compilation is
//! pure: the same selections always produce the same variables.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{AniListError, AniListResult};
use crate::types::{CountryCode, MediaFormat, MediaSort, MediaSourceMaterial, MediaStatus};

/// Whether a multiselect option includes or excludes matching titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InclusionMode {
    /// Only titles matching the option.
    Included,
    /// Titles not matching the option.
    Excluded,
}

/// Shape of the UI control behind a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Option map with include/exclude per option.
    MultiSelect,
    /// Single choice.
    Dropdown,
    /// Free text range.
    Input,
}

/// Search filter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterId {
    Genres,
    Formats,
    PublishingStatuses,
    CountryOfOrigin,
    SourceMaterials,
    StartYears,
    ChapterCounts,
    VolumeCounts,
    Adult,
    Doujin,
    TrackedTitles,
    Tags,
}

impl FilterId {
    /// Every filter, in display order.
    pub const ALL: [Self; 12] = [
        Self::Genres,
        Self::Formats,
        Self::PublishingStatuses,
        Self::CountryOfOrigin,
        Self::SourceMaterials,
        Self::StartYears,
        Self::ChapterCounts,
        Self::VolumeCounts,
        Self::Adult,
        Self::Doujin,
        Self::TrackedTitles,
        Self::Tags,
    ];

    /// Id used by the host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Genres => "genres",
            Self::Formats => "formats",
            Self::PublishingStatuses => "publishing-statuses",
            Self::CountryOfOrigin => "country-of-origin",
            Self::SourceMaterials => "source-materials",
            Self::StartYears => "start-years",
            Self::ChapterCounts => "chapter-counts",
            Self::VolumeCounts => "volume-counts",
            Self::Adult => "adult",
            Self::Doujin => "doujin",
            Self::TrackedTitles => "tracked-titles",
            Self::Tags => "tags",
        }
    }

    /// UI control kind.
    #[must_use]
    pub const fn kind(self) -> FilterKind {
        match self {
            Self::CountryOfOrigin => FilterKind::Dropdown,
            Self::StartYears | Self::ChapterCounts | Self::VolumeCounts => FilterKind::Input,
            _ => FilterKind::MultiSelect,
        }
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterId {
    type Err = AniListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AniListError::InvalidFilter {
                id: s.to_string(),
                reason: "unknown filter".into(),
            })
    }
}

/// One filter's UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSelection {
    /// Option id to inclusion mode.
    MultiSelect {
        /// Selected options.
        selections: BTreeMap<String, InclusionMode>,
    },
    /// Chosen option id.
    Dropdown {
        /// Option id; empty when nothing is chosen.
        value: String,
    },
    /// Text such as `2010-2015` or `7`.
    RangeInput {
        /// Raw text as typed.
        raw_text: String,
    },
}

impl FilterSelection {
    /// Parse host JSON for `id` into the variant its control produces.
    ///
    /// # Errors
    /// Returns [`AniListError::InvalidFilter`] when the value has the wrong shape.
    pub fn parse(id: FilterId, value: &Value) -> AniListResult<Self> {
        let invalid = |reason: String| AniListError::InvalidFilter {
            id: id.as_str().to_string(),
            reason,
        };

        // An untouched control reports null; treat it as nothing selected.
        if value.is_null() {
            return Ok(match id.kind() {
                FilterKind::MultiSelect => Self::MultiSelect {
                    selections: BTreeMap::new(),
                },
                FilterKind::Dropdown => Self::Dropdown {
                    value: String::new(),
                },
                FilterKind::Input => Self::RangeInput {
                    raw_text: String::new(),
                },
            });
        }

        match id.kind() {
            FilterKind::MultiSelect => {
                let selections = BTreeMap::<String, InclusionMode>::deserialize(value)
                    .map_err(|err| invalid(err.to_string()))?;
                Ok(Self::MultiSelect { selections })
            }
            FilterKind::Dropdown => value
                .as_str()
                .map(|value| Self::Dropdown {
                    value: value.to_string(),
                })
                .ok_or_else(|| invalid("expected a string".into())),
            FilterKind::Input => value
                .as_str()
                .map(|raw| Self::RangeInput {
                    raw_text: raw.to_string(),
                })
                .ok_or_else(|| invalid("expected a string".into())),
        }
    }
}

/// Variables of the list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<MediaSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_adult: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_list: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_licensed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<CountryCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_greater: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_lesser: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters_greater: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters_lesser: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes_greater: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes_lesser: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_in: Option<Vec<MediaFormat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_not_in: Option<Vec<MediaFormat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_in: Option<Vec<MediaStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_not_in: Option<Vec<MediaStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_in: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_not_in: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_in: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_not_in: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_in: Option<Vec<MediaSourceMaterial>>,
}

/// Compiled variables and whether the query must be authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilters {
    /// Variables to merge into the list query.
    pub variables: SearchVariables,
    /// Set when a selection depends on the viewer's list.
    pub needs_auth: bool,
}

/// Which range filter a text input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Start years; at most four digits, scaled to `YYYY0000`.
    Years,
    /// Chapter or volume counts.
    Count,
}

/// Fuzzy dates encode a year as `YYYYMMDD`.
const YEAR_SCALE: i64 = 10_000;
const MAX_YEAR: i64 = 9_999;

/// Parse `A-B` or `N` into exclusive `(greater, lesser)` bounds.
///
/// A single value `N` widens to `(N - 1, N + 1)`. Returns `None` for empty,
/// non-numeric, negative, or descending input.
#[must_use]
pub fn parse_range(raw: &str, kind: RangeKind) -> Option<(i64, i64)> {
    let parts = raw
        .trim()
        .split('-')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value = part.parse::<i64>().ok()?;
            (kind == RangeKind::Count || value <= MAX_YEAR).then_some(value)
        })
        .collect::<Option<Vec<_>>>()?;

    let (greater, lesser) = match parts.as_slice() {
        [value] => (value.checked_sub(1)?, value.checked_add(1)?),
        [from, to] if from <= to => (*from, *to),
        _ => return None,
    };

    match kind {
        RangeKind::Years => Some((greater * YEAR_SCALE, lesser * YEAR_SCALE)),
        RangeKind::Count => Some((greater, lesser)),
    }
}

/// Option id for a genre name.
#[must_use]
pub fn encode_genre_id(name: &str) -> String {
    name.replace(' ', "_")
}

/// Genre name for an option id.
#[must_use]
pub fn decode_genre_id(id: &str) -> String {
    id.replace('_', " ")
}

/// Option id for a tag name.
#[must_use]
pub fn encode_tag_id(name: &str) -> String {
    name.replace(' ', "_").replace('\'', "?")
}

/// Tag name for an option id.
#[must_use]
pub fn decode_tag_id(id: &str) -> String {
    id.replace('_', " ").replace('?', "'")
}

/// Split selections into included and excluded values, mapping each option id.
///
/// Options that `map` rejects are dropped.
fn partition<T>(
    selections: &BTreeMap<String, InclusionMode>,
    mut map: impl FnMut(&str) -> Option<T>,
) -> (Option<Vec<T>>, Option<Vec<T>>) {
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    for (option, mode) in selections {
        let Some(value) = map(option.as_str()) else {
            debug!(option = %option, "dropping unknown filter option");
            continue;
        };
        match mode {
            InclusionMode::Included => included.push(value),
            InclusionMode::Excluded => excluded.push(value),
        }
    }
    let non_empty = |values: Vec<T>| (!values.is_empty()).then_some(values);
    (non_empty(included), non_empty(excluded))
}

/// Mode of a single-option filter; `None` unless exactly one option is set.
fn singleton(selections: &BTreeMap<String, InclusionMode>) -> Option<InclusionMode> {
    match selections.len() {
        1 => selections.values().next().copied(),
        _ => None,
    }
}

/// Compile filter selections into list query variables.
#[must_use]
pub fn compile(selections: &[(FilterId, FilterSelection)]) -> CompiledFilters {
    let mut compiled = CompiledFilters::default();
    for (id, selection) in selections {
        apply(&mut compiled, *id, selection);
    }
    compiled
}

fn apply(compiled: &mut CompiledFilters, id: FilterId, selection: &FilterSelection) {
    let vars = &mut compiled.variables;
    match (id, selection) {
        (FilterId::Genres, FilterSelection::MultiSelect { selections }) => {
            (vars.genre_in, vars.genre_not_in) =
                partition(selections, |option| Some(decode_genre_id(option)));
        }
        (FilterId::Tags, FilterSelection::MultiSelect { selections }) => {
            (vars.tag_in, vars.tag_not_in) =
                partition(selections, |option| Some(decode_tag_id(option)));
        }
        (FilterId::Formats, FilterSelection::MultiSelect { selections }) => {
            (vars.format_in, vars.format_not_in) = partition(selections, MediaFormat::from_id);
        }
        (FilterId::PublishingStatuses, FilterSelection::MultiSelect { selections }) => {
            (vars.status_in, vars.status_not_in) = partition(selections, MediaStatus::from_id);
        }
        (FilterId::SourceMaterials, FilterSelection::MultiSelect { selections }) => {
            (vars.source_in, _) = partition(selections, MediaSourceMaterial::from_id);
        }
        (FilterId::Adult, FilterSelection::MultiSelect { selections }) => {
            if let Some(mode) = singleton(selections) {
                vars.is_adult = Some(mode == InclusionMode::Included);
            }
        }
        (FilterId::Doujin, FilterSelection::MultiSelect { selections }) => {
            if let Some(mode) = singleton(selections) {
                vars.is_licensed = Some(mode == InclusionMode::Excluded);
            }
        }
        (FilterId::TrackedTitles, FilterSelection::MultiSelect { selections }) => {
            if let Some(mode) = singleton(selections) {
                vars.on_list = Some(mode == InclusionMode::Included);
                compiled.needs_auth = true;
            }
        }
        (FilterId::CountryOfOrigin, FilterSelection::Dropdown { value }) => {
            if !value.is_empty() {
                vars.country_of_origin = CountryCode::from_id(value);
            }
        }
        (FilterId::StartYears, FilterSelection::RangeInput { raw_text }) => {
            if let Some((greater, lesser)) = parse_range(raw_text, RangeKind::Years) {
                vars.start_date_greater = Some(greater);
                vars.start_date_lesser = Some(lesser);
            }
        }
        (FilterId::ChapterCounts, FilterSelection::RangeInput { raw_text }) => {
            if let Some((greater, lesser)) = parse_range(raw_text, RangeKind::Count) {
                vars.chapters_greater = Some(greater);
                vars.chapters_lesser = Some(lesser);
            }
        }
        (FilterId::VolumeCounts, FilterSelection::RangeInput { raw_text }) => {
            if let Some((greater, lesser)) = parse_range(raw_text, RangeKind::Count) {
                vars.volumes_greater = Some(greater);
                vars.volumes_lesser = Some(lesser);
            }
        }
        (id, _) => debug!(filter = %id, "ignoring selection of the wrong kind"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn multi(pairs: &[(&str, InclusionMode)]) -> FilterSelection {
        FilterSelection::MultiSelect {
            selections: pairs
                .iter()
                .map(|(id, mode)| ((*id).to_string(), *mode))
                .collect(),
        }
    }

    fn range(raw: &str) -> FilterSelection {
        FilterSelection::RangeInput {
            raw_text: raw.to_string(),
        }
    }

    fn compile_one(id: FilterId, selection: FilterSelection) -> CompiledFilters {
        compile(&[(id, selection)])
    }

    #[test]
    fn test_genres_included_and_excluded() {
        let compiled = compile_one(
            FilterId::Genres,
            multi(&[
                ("Action", InclusionMode::Included),
                ("Ecchi", InclusionMode::Excluded),
            ]),
        );

        assert_eq!(
            serde_json::to_value(&compiled.variables).unwrap(),
            json!({"genreIn": ["Action"], "genreNotIn": ["Ecchi"]})
        );
        assert!(!compiled.needs_auth);
    }

    #[test]
    fn test_chapter_range() {
        let compiled = compile_one(FilterId::ChapterCounts, range("2010-2015"));
        assert_eq!(
            serde_json::to_value(&compiled.variables).unwrap(),
            json!({"chaptersGreater": 2010, "chaptersLesser": 2015})
        );
    }

    #[test]
    fn test_single_value_widens() {
        for n in [0_i64, 1, 7, 350] {
            assert_eq!(
                parse_range(&n.to_string(), RangeKind::Count),
                Some((n - 1, n + 1))
            );
        }
        assert_eq!(
            parse_range("2015", RangeKind::Years),
            Some((20_140_000, 20_160_000))
        );
    }

    #[test]
    fn test_years_are_scaled() {
        let compiled = compile_one(FilterId::StartYears, range("2010-2015"));
        assert_eq!(compiled.variables.start_date_greater, Some(20_100_000));
        assert_eq!(compiled.variables.start_date_lesser, Some(20_150_000));
    }

    #[test]
    fn test_rejected_ranges_emit_nothing() {
        for raw in [
            "", "-", "15-10", "1-2-3", "abc", "-5", "1.5", "3-", "10000", "2010-10000",
        ] {
            let kind = if raw.contains("10000") {
                RangeKind::Years
            } else {
                RangeKind::Count
            };
            assert_eq!(parse_range(raw, kind), None, "{raw:?} should be rejected");
        }

        let compiled = compile_one(FilterId::VolumeCounts, range("20-3"));
        assert_eq!(compiled.variables, SearchVariables::default());

        let max = i64::MAX.to_string();
        assert_eq!(parse_range(&max, RangeKind::Count), None);
        let compiled = compile_one(FilterId::ChapterCounts, range(&max));
        assert_eq!(compiled.variables, SearchVariables::default());
    }

    #[test]
    fn test_ascending_ranges_pass_through() {
        for (a, b) in [(0, 0), (1, 2), (5, 500)] {
            assert_eq!(
                parse_range(&format!("{a}-{b}"), RangeKind::Count),
                Some((a, b))
            );
            assert_eq!(
                parse_range(&format!(" {a} - {b} "), RangeKind::Years),
                Some((a * 10_000, b * 10_000))
            );
        }
    }

    #[test]
    fn test_singleton_booleans() {
        let adult = compile_one(FilterId::Adult, multi(&[("adult", InclusionMode::Excluded)]));
        assert_eq!(adult.variables.is_adult, Some(false));

        let doujin = compile_one(FilterId::Doujin, multi(&[("doujin", InclusionMode::Included)]));
        assert_eq!(doujin.variables.is_licensed, Some(false));

        let tracked = compile_one(
            FilterId::TrackedTitles,
            multi(&[("tracked", InclusionMode::Included)]),
        );
        assert_eq!(tracked.variables.on_list, Some(true));
        assert!(tracked.needs_auth);
    }

    #[test]
    fn test_singleton_with_other_sizes_is_ignored() {
        for selection in [
            multi(&[]),
            multi(&[("a", InclusionMode::Included), ("b", InclusionMode::Excluded)]),
        ] {
            let compiled = compile_one(FilterId::TrackedTitles, selection);
            assert_eq!(compiled, CompiledFilters::default());
        }
    }

    #[test]
    fn test_source_materials_are_include_only() {
        let compiled = compile_one(
            FilterId::SourceMaterials,
            multi(&[
                ("LIGHT_NOVEL", InclusionMode::Included),
                ("ANIME", InclusionMode::Excluded),
            ]),
        );
        assert_eq!(
            compiled.variables.source_in,
            Some(vec![MediaSourceMaterial::LightNovel])
        );
    }

    #[test]
    fn test_unknown_enum_options_are_dropped() {
        let compiled = compile_one(
            FilterId::Formats,
            multi(&[
                ("MOVIE", InclusionMode::Included),
                ("NOVEL", InclusionMode::Excluded),
            ]),
        );
        assert_eq!(compiled.variables.format_in, None);
        assert_eq!(compiled.variables.format_not_in, Some(vec![MediaFormat::Novel]));
    }

    #[test]
    fn test_country_dropdown() {
        let empty = compile_one(
            FilterId::CountryOfOrigin,
            FilterSelection::Dropdown { value: String::new() },
        );
        assert_eq!(empty.variables.country_of_origin, None);

        let korea = compile_one(
            FilterId::CountryOfOrigin,
            FilterSelection::Dropdown { value: "KR".into() },
        );
        assert_eq!(
            serde_json::to_value(&korea.variables).unwrap(),
            json!({"countryOfOrigin": "KR"})
        );
    }

    #[test]
    fn test_tag_ids_decode() {
        let compiled = compile_one(
            FilterId::Tags,
            multi(&[("Boys?_Love", InclusionMode::Included)]),
        );
        assert_eq!(compiled.variables.tag_in, Some(vec!["Boys' Love".to_string()]));
        assert_eq!(encode_tag_id("Boys' Love"), "Boys?_Love");
        assert_eq!(decode_genre_id(&encode_genre_id("Slice of Life")), "Slice of Life");
    }

    #[test]
    fn test_included_and_excluded_are_disjoint() {
        let options = ["Action", "Comedy", "Drama", "Slice_of_Life", "Sports"];
        let pairs: Vec<_> = options
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let mode = if i % 2 == 0 {
                    InclusionMode::Included
                } else {
                    InclusionMode::Excluded
                };
                (*id, mode)
            })
            .collect();

        let vars = compile_one(FilterId::Genres, multi(&pairs)).variables;
        let included = vars.genre_in.unwrap_or_default();
        let excluded = vars.genre_not_in.unwrap_or_default();

        assert!(included.iter().all(|genre| !excluded.contains(genre)));
        assert_eq!(included.len() + excluded.len(), options.len());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let selections = vec![
            (
                FilterId::Genres,
                multi(&[
                    ("Romance", InclusionMode::Included),
                    ("Action", InclusionMode::Included),
                ]),
            ),
            (FilterId::StartYears, range("1999")),
            (
                FilterId::CountryOfOrigin,
                FilterSelection::Dropdown { value: "JP".into() },
            ),
        ];

        let first = serde_json::to_vec(&compile(&selections).variables).unwrap();
        let second = serde_json::to_vec(&compile(&selections).variables).unwrap();
        assert_eq!(first, second);

        let mut reversed = selections.clone();
        reversed.reverse();
        assert_eq!(compile(&reversed), compile(&selections));
    }

    #[test]
    fn test_mismatched_variant_is_ignored() {
        let compiled = compile_one(FilterId::Genres, range("1-2"));
        assert_eq!(compiled, CompiledFilters::default());
    }

    #[test]
    fn test_parse_boundary_values() {
        let genres = FilterSelection::parse(
            FilterId::Genres,
            &json!({"Action": "included", "Ecchi": "excluded"}),
        )
        .unwrap();
        assert_eq!(
            genres,
            multi(&[
                ("Action", InclusionMode::Included),
                ("Ecchi", InclusionMode::Excluded),
            ])
        );

        assert_eq!(
            FilterSelection::parse(FilterId::ChapterCounts, &json!("1-5")).unwrap(),
            range("1-5")
        );

        let err = FilterSelection::parse(FilterId::Genres, &json!(["Action"])).unwrap_err();
        assert!(matches!(err, AniListError::InvalidFilter { ref id, .. } if id == "genres"));
        assert!(FilterSelection::parse(FilterId::CountryOfOrigin, &json!(3)).is_err());
    }

    #[test]
    fn test_null_values_select_nothing() {
        let selections: Vec<(FilterId, FilterSelection)> = FilterId::ALL
            .into_iter()
            .map(|id| (id, FilterSelection::parse(id, &Value::Null).unwrap()))
            .collect();

        assert_eq!(selections[0].1, multi(&[]));
        assert_eq!(compile(&selections), CompiledFilters::default());
    }

    #[test]
    fn test_filter_id_round_trip() {
        for id in FilterId::ALL {
            assert_eq!(id.as_str().parse::<FilterId>().unwrap(), id);
        }
        assert!("colour".parse::<FilterId>().is_err());
    }
}
