// src/orchestrator.rs
//! Batch pipeline: create playlist → per video (upload, attach) → persist
//! results. Strictly sequential; concurrent uploads would multiply quota
//! pressure and complicate partial-failure bookkeeping.

use crate::auth::AuthGateway;
use crate::drive_client::DriveClient;
use crate::error::UploaderError;
use crate::reauth::with_auto_reauth;
use crate::result_store::ResultStore;
use crate::types::{
    build_video_description, effective_title, BatchJob, ProgressEvent, ProgressPhase, UploadItem,
    UploadResult,
};
use crate::youtube_client::{UploadedVideo, YouTubeClient};
use tokio::sync::mpsc;

/// What to do with the result store once a batch (or its surviving prefix)
/// is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Replace the stored history with this batch's results.
    Replace,
    /// Keep prior history and append this batch's results.
    Append,
}

pub struct BatchUploadOrchestrator {
    auth: AuthGateway,
    drive: DriveClient,
    youtube: YouTubeClient,
    results: ResultStore,
    progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl BatchUploadOrchestrator {
    pub fn new(
        auth: AuthGateway,
        drive: DriveClient,
        youtube: YouTubeClient,
        results: ResultStore,
    ) -> Self {
        Self {
            auth,
            drive,
            youtube,
            results,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sender: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Uploads every item, in order, into a newly created playlist.
    ///
    /// Playlist creation failure aborts the batch before any upload. A
    /// per-item failure aborts the remainder, but results already produced
    /// are persisted and the error names the failing item. Results are
    /// recorded only once the attach-to-playlist step succeeded.
    ///
    /// A single batch at a time: overlapping `run` calls against the same
    /// stores are unsupported.
    pub async fn run(
        &self,
        items: Vec<UploadItem>,
        playlist_name: &str,
        playlist_description: &str,
        persist: PersistMode,
    ) -> Result<Vec<UploadResult>, UploaderError> {
        let mut job = BatchJob::new(items, playlist_name, playlist_description);
        let total = job.items.len();
        tracing::info!(
            "🎬 Starting batch {} ({} videos -> playlist {:?})",
            job.id,
            total,
            playlist_name
        );

        self.emit(
            ProgressPhase::CreatePlaylist,
            None,
            total,
            format!("Creating playlist {}...", playlist_name),
        );
        let playlist_id = self
            .youtube
            .create_playlist(playlist_name, playlist_description)
            .await
            .map_err(|source| UploaderError::PlaylistCreation {
                name: playlist_name.to_string(),
                source: Box::new(source),
            })?;
        job.set_playlist_id(playlist_id.clone());

        let mut uploaded: Vec<UploadResult> = Vec::with_capacity(total);
        for (index, item) in job.items.iter().enumerate() {
            let title = effective_title(item, playlist_name);
            let description = build_video_description(item.score_desc.as_deref());

            self.emit(
                ProgressPhase::Uploading,
                Some(index),
                total,
                format!("Uploading video {} of {} ({})...", index + 1, total, title),
            );
            let video = match self.upload_one(item, &title, &description).await {
                Ok(video) => video,
                Err(source) => {
                    self.persist_partial(&uploaded, persist).await;
                    return Err(UploaderError::UploadTransfer {
                        index,
                        title,
                        source: Box::new(source),
                    });
                }
            };

            if let Err(source) = self
                .youtube
                .add_video_to_playlist(&playlist_id, &video.id)
                .await
            {
                self.persist_partial(&uploaded, persist).await;
                return Err(UploaderError::PlaylistAttach {
                    index,
                    title,
                    source: Box::new(source),
                });
            }

            // only counted as done once it is actually in the playlist
            uploaded.push(UploadResult {
                title,
                video_id: video.id,
            });
            self.emit(
                ProgressPhase::Attached,
                Some(index),
                total,
                format!("Added video {} of {} to the playlist", index + 1, total),
            );
        }

        match persist {
            PersistMode::Replace => self.results.replace(&uploaded).await?,
            PersistMode::Append => self.results.append(&uploaded).await?,
        }

        self.emit(
            ProgressPhase::Complete,
            None,
            total,
            "All videos uploaded and added to the playlist".to_string(),
        );
        tracing::info!("✅ Batch {} complete ({} videos)", job.id, uploaded.len());
        Ok(uploaded)
    }

    /// One video, end to end: validate Drive access, open the resumable
    /// session, fetch the bytes, transfer them. The whole sequence is one
    /// auto-reauth unit because its requests share a token and a 401 can
    /// strike any of them.
    async fn upload_one(
        &self,
        item: &UploadItem,
        title: &str,
        description: &str,
    ) -> Result<UploadedVideo, UploaderError> {
        with_auto_reauth(&self.auth, |token| {
            let item = item.clone();
            let title = title.to_string();
            let description = description.to_string();
            async move {
                let meta = self.drive.validate_file_access(&token, &item.id).await?;
                tracing::debug!("File access confirmed: {} ({})", meta.name, meta.mime_type);

                let session_url = self
                    .youtube
                    .create_upload_session(&token, &title, &description)
                    .await?;
                let bytes = self.drive.get_file_bytes(&token, &item.id).await?;
                self.youtube.put_bytes(&session_url, bytes).await
            }
        })
        .await
    }

    /// Best-effort persistence of the surviving prefix after a mid-batch
    /// failure; the original error is what the caller needs to see.
    async fn persist_partial(&self, uploaded: &[UploadResult], persist: PersistMode) {
        if uploaded.is_empty() {
            return;
        }
        let outcome = match persist {
            PersistMode::Replace => self.results.replace(uploaded).await,
            PersistMode::Append => self.results.append(uploaded).await,
        };
        if let Err(e) = outcome {
            tracing::warn!(
                "Failed to persist {} partial result(s) after batch failure: {}",
                uploaded.len(),
                e
            );
        }
    }

    fn emit(&self, phase: ProgressPhase, index: Option<usize>, total: usize, message: String) {
        tracing::debug!("progress {:?}: {}", phase, message);
        if let Some(sender) = &self.progress {
            // a dead progress listener must never fail the batch
            let _ = sender.send(ProgressEvent::new(phase, index, total, message));
        }
    }
}
