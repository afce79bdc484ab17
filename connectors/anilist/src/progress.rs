//! Reading progress tracking.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::capabilities::ProgressProviding;
use crate::connector::{AniListConnector, parse_id};
use crate::error::{AniListError, AniListResult};
use crate::queries::{
    DeleteEntryVariables, DeleteProgressMutation, ListEntryVariables, SaveEntryVariables,
    SaveProgressMutation, TitleProgressQuery,
};
use crate::types::{MediaListEntry, MediaListStatus};

/// Where the viewer is in a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaProgress {
    pub manga_id: String,
    pub last_read_chapter: u32,
    pub last_read_volume: u32,
    pub last_read_time: Option<DateTime<Utc>>,
    pub user_rating: f64,
}

/// Fields of a list entry the host may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub status: Option<MediaListStatus>,
    pub score: Option<f64>,
    pub progress: Option<u32>,
    pub progress_volumes: Option<u32>,
    pub repeat: Option<u32>,
    pub private: Option<bool>,
    pub notes: Option<String>,
    pub hidden_from_status_lists: Option<bool>,
}

impl ProgressUpdate {
    /// Update carrying every editable field of `entry`.
    #[must_use]
    pub fn from_entry(entry: &MediaListEntry) -> Self {
        Self {
            status: entry.status,
            score: Some(entry.score),
            progress: Some(entry.progress),
            progress_volumes: Some(entry.progress_volumes),
            repeat: Some(entry.repeat),
            private: Some(entry.private),
            notes: entry.notes.clone(),
            hidden_from_status_lists: Some(entry.hidden_from_status_lists),
        }
    }

    fn into_variables(self, media_id: u64) -> SaveEntryVariables {
        SaveEntryVariables {
            media_id,
            status: self.status,
            score: self.score,
            progress: self.progress,
            progress_volumes: self.progress_volumes,
            repeat: self.repeat,
            private: self.private,
            notes: self.notes,
            hidden_from_status_lists: self.hidden_from_status_lists,
        }
    }
}

/// A chapter the viewer finished in the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterReadAction {
    /// Action id, echoed back in the outcome.
    pub id: String,
    pub manga_id: String,
    pub chapter_num: f64,
    #[serde(default)]
    pub chapter_volume: Option<f64>,
}

/// Which read actions were synced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadActionOutcome {
    pub successful_items: Vec<String>,
    pub failed_items: Vec<String>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u32 {
    value.floor().max(0.0) as u32
}

impl AniListConnector {
    fn require_viewer(&self) -> AniListResult<u64> {
        self.viewer_id().ok_or(AniListError::NotAuthenticated)
    }

    /// The viewer's entry for a title; `None` when the remote reports it missing.
    async fn list_entry(&self, user_id: u64, media_id: u64) -> AniListResult<Option<MediaListEntry>> {
        match self
            .client()
            .execute::<TitleProgressQuery>(&ListEntryVariables { user_id, media_id })
            .await
        {
            Ok(data) => Ok(Some(data.media_list)),
            Err(err) if err.is_not_found() => {
                debug!(media_id, "title is not on the viewer's list");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save_entry(&self, variables: &SaveEntryVariables) -> AniListResult<MediaListEntry> {
        let data = self
            .client()
            .execute::<SaveProgressMutation>(variables)
            .await?;
        Ok(data.entry)
    }

    /// Sync one action that carries the highest chapter for its title.
    async fn sync_read_action(&self, user_id: u64, action: &ChapterReadAction) -> AniListResult<()> {
        let media_id = parse_id(&action.manga_id)?;
        let chapter = whole(action.chapter_num);
        let entry = self.list_entry(user_id, media_id).await?;

        if entry.as_ref().is_some_and(|entry| entry.progress >= chapter) {
            debug!(media_id, chapter, "remote progress already ahead");
            return Ok(());
        }

        let mut variables = SaveEntryVariables::for_media(media_id);
        variables.progress = Some(chapter);
        if entry.is_none() {
            variables.status = Some(MediaListStatus::Current);
        }
        if let Some(volume) = action.chapter_volume.map(whole).filter(|volume| *volume > 0) {
            let remote_volumes = entry.as_ref().map_or(0, |entry| entry.progress_volumes);
            if remote_volumes < volume {
                variables.progress_volumes = Some(volume - 1);
            }
        }

        self.save_entry(&variables).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressProviding for AniListConnector {
    #[instrument(skip(self))]
    async fn manga_progress(&self, manga_id: &str) -> AniListResult<Option<MangaProgress>> {
        let user_id = self.require_viewer()?;
        let media_id = parse_id(manga_id)?;

        Ok(self
            .list_entry(user_id, media_id)
            .await?
            .map(|entry| MangaProgress {
                manga_id: media_id.to_string(),
                last_read_chapter: entry.progress,
                last_read_volume: entry.progress_volumes,
                last_read_time: entry
                    .updated_at
                    .and_then(|secs| DateTime::from_timestamp(secs, 0)),
                user_rating: entry.score,
            }))
    }

    async fn progress_entry(&self, manga_id: &str) -> AniListResult<MediaListEntry> {
        let user_id = self.require_viewer()?;
        let media_id = parse_id(manga_id)?;
        Ok(self
            .list_entry(user_id, media_id)
            .await?
            .unwrap_or_default())
    }

    #[instrument(skip(self, update))]
    async fn save_progress(
        &self,
        manga_id: &str,
        update: &ProgressUpdate,
    ) -> AniListResult<MediaListEntry> {
        self.require_viewer()?;
        let media_id = parse_id(manga_id)?;
        self.save_entry(&update.clone().into_variables(media_id))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_progress(&self, list_entry_id: &str) -> AniListResult<bool> {
        self.require_viewer()?;
        let id = parse_id(list_entry_id)?;
        let data = self
            .client()
            .execute::<DeleteProgressMutation>(&DeleteEntryVariables {
                delete_media_list_entry_id: id,
            })
            .await?;
        Ok(data.result.deleted)
    }

    #[instrument(skip_all, fields(actions = actions.len()))]
    async fn process_read_actions(
        &self,
        actions: &[ChapterReadAction],
    ) -> AniListResult<ReadActionOutcome> {
        let mut outcome = ReadActionOutcome::default();
        let Some(user_id) = self.viewer_id() else {
            debug!("no viewer; skipping read action sync");
            return Ok(outcome);
        };

        let mut highest: BTreeMap<&str, u32> = BTreeMap::new();
        for action in actions {
            let chapter = whole(action.chapter_num);
            let best = highest.entry(action.manga_id.as_str()).or_insert(0);
            if *best < chapter {
                *best = chapter;
            }
        }

        for action in actions {
            let chapter = whole(action.chapter_num);
            // Only the first action at a title's highest chapter is synced.
            if highest.get(action.manga_id.as_str()) != Some(&chapter) {
                outcome.successful_items.push(action.id.clone());
                continue;
            }
            highest.remove(action.manga_id.as_str());

            match self.sync_read_action(user_id, action).await {
                Ok(()) => outcome.successful_items.push(action.id.clone()),
                Err(err) => {
                    warn!(action = %action.id, error = %err, "read action sync failed");
                    outcome.failed_items.push(action.id.clone());
                }
            }
        }

        Ok(outcome)
    }
}
