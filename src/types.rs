// src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UPLOADER_TAGLINE: &str = "Uploaded via Road2Nationals Uploader";
pub const PLAYLIST_DESCRIPTION_SUFFIX: &str =
    "\n\n\nPlaylist automatically generated via Road2Nationals Uploader";

/// A source video reference plus optional per-video user input.
/// Immutable once a batch starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Free-text score or description line entered by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_desc: Option<String>,
    /// Replaces the file name as the video title when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_override: Option<String>,
}

impl UploadItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            score_desc: None,
            title_override: None,
        }
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score_desc = Some(score.into());
        self
    }

    pub fn with_title_override(mut self, title: impl Into<String>) -> Self {
        self.title_override = Some(title.into());
        self
    }
}

/// Produced once per video, only after the attach-to-playlist step
/// succeeded. Persisted as `{title, id}` pairs; titles are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub title: String,
    #[serde(rename = "id")]
    pub video_id: String,
}

/// One run of the batch pipeline. In-memory only; a crashed batch is not
/// resumable.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub id: String,
    pub items: Vec<UploadItem>,
    pub playlist_name: String,
    pub playlist_description: String,
    playlist_id: Option<String>,
}

impl BatchJob {
    pub fn new(
        items: Vec<UploadItem>,
        playlist_name: impl Into<String>,
        playlist_description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            items,
            playlist_name: playlist_name.into(),
            playlist_description: playlist_description.into(),
            playlist_id: None,
        }
    }

    pub fn playlist_id(&self) -> Option<&str> {
        self.playlist_id.as_deref()
    }

    /// Set at most once, only after the playlist-creation step succeeds.
    pub fn set_playlist_id(&mut self, id: String) {
        debug_assert!(self.playlist_id.is_none(), "playlist id set twice");
        self.playlist_id = Some(id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressPhase {
    CreatePlaylist,
    Uploading,
    Attached,
    Complete,
}

/// Transient notification emitted at each phase transition of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub index: Option<usize>,
    pub total: usize,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(phase: ProgressPhase, index: Option<usize>, total: usize, message: String) -> Self {
        Self {
            phase,
            index,
            total,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Resolves the title a video is published under:
/// override + playlist name when both are present, the override alone
/// otherwise, else the file name with its extension stripped.
pub fn effective_title(item: &UploadItem, playlist_name: &str) -> String {
    let title_override = item
        .title_override
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match title_override {
        Some(base) if !playlist_name.is_empty() => format!("{} {}", base, playlist_name),
        Some(base) => base.to_string(),
        None => strip_extension(&item.name).to_string(),
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Fixed description template: optional score line plus the uploader
/// tagline.
pub fn build_video_description(score_desc: Option<&str>) -> String {
    let score_line = score_desc
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("Score: {}\n", s))
        .unwrap_or_default();
    format!("{}\n{}", score_line, UPLOADER_TAGLINE)
}
