//! Remote record to display item normalization.

use serde::{Deserialize, Serialize};

use crate::types::{MediaFormat, MediaRecord, MediaStatus};

/// Audience rating of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentRating {
    Everyone,
    Mature,
    Adult,
}

/// A title as shown in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    /// Title id.
    pub id: String,
    /// Decorated title.
    pub title: String,
    /// Cover thumbnail.
    pub thumbnail_url: Option<String>,
    /// Audience rating.
    pub content_rating: ContentRating,
    /// Status or chapter/volume counts.
    pub subtitle: Option<String>,
}

/// Separator between a title and its appended synonym.
pub const SYNONYM_SEPARATOR: &str = " / ";

/// Build the list item for a record.
#[must_use]
pub fn normalize_record(record: &MediaRecord, show_synonyms: bool) -> DisplayItem {
    let mut title = format!(
        "{}{}",
        format_prefix(record.format.as_deref()),
        record.title.preferred()
    );
    if show_synonyms && !record.title.has_english() {
        if let Some(synonym) = record.synonyms.first() {
            title.push_str(SYNONYM_SEPARATOR);
            title.push_str(synonym);
        }
    }

    DisplayItem {
        id: record.id.to_string(),
        title,
        thumbnail_url: record.cover_image.large.clone(),
        content_rating: content_rating(record.is_adult, &record.genres),
        subtitle: subtitle(record),
    }
}

/// Prefix marking formats other than plain manga.
#[must_use]
pub fn format_prefix(format: Option<&str>) -> &'static str {
    match format.and_then(MediaFormat::from_id) {
        Some(MediaFormat::Novel) => "(Novel) ",
        Some(MediaFormat::OneShot) => "(One Shot) ",
        _ => "",
    }
}

/// `Adult` for adult titles, `Mature` for ecchi, `Everyone` otherwise.
#[must_use]
pub fn content_rating<S: AsRef<str>>(is_adult: bool, genres: &[S]) -> ContentRating {
    if is_adult {
        ContentRating::Adult
    } else if genres
        .iter()
        .any(|genre| genre.as_ref().eq_ignore_ascii_case("ecchi"))
    {
        ContentRating::Mature
    } else {
        ContentRating::Everyone
    }
}

/// Label of a status id, if known.
#[must_use]
pub fn status_label(status: Option<&str>) -> Option<&'static str> {
    status.and_then(MediaStatus::from_id).map(MediaStatus::label)
}

fn subtitle(record: &MediaRecord) -> Option<String> {
    let status = record.status.as_deref();
    if status.and_then(MediaStatus::from_id) != Some(MediaStatus::Finished) {
        return status_label(status).map(str::to_string);
    }

    let counts: Vec<String> = [
        record.chapters.filter(|n| *n > 0).map(|n| format!("Chs. {n}")),
        record.volumes.filter(|n| *n > 0).map(|n| format!("Vols. {n}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if counts.is_empty() {
        status_label(status).map(str::to_string)
    } else {
        Some(counts.join(" "))
    }
}
