// src/youtube_client.rs
// YouTube Data API v3 client for playlist management and resumable uploads.
// Docs: https://developers.google.com/youtube/v3

use crate::client::{check_status, ResilientClient};
use crate::config::UploaderConfig;
use crate::error::UploaderError;
use crate::types::PLAYLIST_DESCRIPTION_SUFFIX;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// People & Blogs.
pub const VIDEO_CATEGORY_ID: &str = "22";
pub const PRIVACY_STATUS: &str = "public";

#[derive(Debug, Deserialize)]
struct PlaylistCreated {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedVideo {
    pub id: String,
}

#[derive(Clone)]
pub struct YouTubeClient {
    client: ResilientClient,
    http: Client,
    base_url: String,
    upload_base_url: String,
}

impl YouTubeClient {
    pub fn new(
        client: ResilientClient,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            http: Client::new(),
            base_url: base_url.into(),
            upload_base_url: upload_base_url.into(),
        }
    }

    pub fn from_config(client: ResilientClient, config: &UploaderConfig) -> Self {
        Self::new(
            client,
            config.youtube_base_url.clone(),
            config.youtube_upload_base_url.clone(),
        )
    }

    /// Creates the destination playlist; the fixed generated-by suffix is
    /// appended to the caller's description. Returns the playlist id.
    pub async fn create_playlist(
        &self,
        title: &str,
        description: &str,
    ) -> Result<String, UploaderError> {
        let url = format!("{}/playlists?part=snippet,status", self.base_url);
        let body = json!({
            "snippet": {
                "title": title,
                "description": format!("{}{}", description, PLAYLIST_DESCRIPTION_SUFFIX),
            },
            "status": { "privacyStatus": PRIVACY_STATUS },
        });

        tracing::info!("📋 Creating playlist: {}", title);
        let res = self.client.post_json(&url, &body).await?;
        let created: PlaylistCreated =
            res.json().await.map_err(|source| UploaderError::Network { url, source })?;
        tracing::info!("✅ Playlist created: {} (ID: {})", title, created.id);
        Ok(created.id)
    }

    pub async fn add_video_to_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), UploaderError> {
        let url = format!("{}/playlistItems?part=snippet", self.base_url);
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": { "kind": "youtube#video", "videoId": video_id },
            }
        });
        self.client.post_json(&url, &body).await?;
        tracing::debug!("Added video {} to playlist {}", video_id, playlist_id);
        Ok(())
    }

    /// Opens a resumable upload session and returns the session URL from
    /// the Location header. Raw (not 401-wrapped): the whole upload
    /// operation is retried end-to-end by the auto-reauth decorator.
    pub async fn create_upload_session(
        &self,
        access_token: &str,
        title: &str,
        description: &str,
    ) -> Result<String, UploaderError> {
        let url = format!(
            "{}/videos?uploadType=resumable&part=snippet,status",
            self.upload_base_url
        );
        let metadata = json!({
            "snippet": {
                "title": title,
                "description": description,
                "categoryId": VIDEO_CATEGORY_ID,
            },
            "status": {
                "privacyStatus": PRIVACY_STATUS,
                "selfDeclaredMadeForKids": true,
            },
        });

        let res = self
            .http
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", access_token),
            )
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("X-Upload-Content-Type", "video/*")
            .json(&metadata)
            .send()
            .await
            .map_err(|source| UploaderError::Network {
                url: url.clone(),
                source,
            })?;
        let res = check_status(res, &url).await?;

        res.headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(UploaderError::MissingSessionUrl)
    }

    /// Transfers the video bytes to a resumable session URL. The session
    /// URL is pre-authorized, so no bearer header is attached. Any non-2xx
    /// here surfaces immediately; there is no partial-chunk recovery.
    pub async fn put_bytes(
        &self,
        session_url: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedVideo, UploaderError> {
        let res = self
            .http
            .put(session_url)
            .header(reqwest::header::CONTENT_TYPE, "video/*")
            .body(bytes)
            .send()
            .await
            .map_err(|source| UploaderError::Network {
                url: session_url.to_string(),
                source,
            })?;
        let res = check_status(res, session_url).await?;

        let video: UploadedVideo =
            res.json()
                .await
                .map_err(|source| UploaderError::Network {
                    url: session_url.to_string(),
                    source,
                })?;
        tracing::info!("✅ Video uploaded (ID: {})", video.id);
        Ok(video)
    }
}
