// src/drive_client.rs
// Google Drive API v3 client, read-only: listing, access validation,
// media download.

use crate::client::{check_status, ResilientClient};
use crate::config::UploaderConfig;
use crate::error::UploaderError;
use crate::types::UploadItem;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl From<DriveFile> for UploadItem {
    fn from(file: DriveFile) -> Self {
        UploadItem::new(file.id, file.name, file.mime_type)
    }
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Clone)]
pub struct DriveClient {
    client: ResilientClient,
    http: Client,
    base_url: String,
}

impl DriveClient {
    pub fn new(client: ResilientClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(client: ResilientClient, config: &UploaderConfig) -> Self {
        Self::new(client, config.drive_base_url.clone())
    }

    pub async fn list_folders(&self) -> Result<Vec<DriveFile>, UploaderError> {
        self.list("mimeType='application/vnd.google-apps.folder' and trashed=false")
            .await
    }

    pub async fn list_videos_in_folder(
        &self,
        folder_id: &str,
    ) -> Result<Vec<DriveFile>, UploaderError> {
        self.list(&format!(
            "'{}' in parents and mimeType contains 'video/' and trashed=false",
            folder_id
        ))
        .await
    }

    async fn list(&self, query: &str) -> Result<Vec<DriveFile>, UploaderError> {
        let url = format!(
            "{}/files?q={}&fields={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode("files(id,name,mimeType)"),
        );
        let res = self.client.get(&url).await?;
        let list: FileListResponse = res.json().await.map_err(|source| UploaderError::Network {
            url,
            source,
        })?;
        Ok(list.files)
    }

    /// Lightweight metadata request before an upload starts, so permission
    /// problems surface early instead of mid-batch. With the drive.file
    /// scope only picker-selected (or app-created) files are reachable.
    pub async fn validate_file_access(
        &self,
        access_token: &str,
        file_id: &str,
    ) -> Result<DriveFile, UploaderError> {
        let url = format!("{}/files/{}?fields=id,name,mimeType", self.base_url, file_id);
        let res = self
            .http
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", access_token),
            )
            .send()
            .await
            .map_err(|source| UploaderError::Network {
                url: url.clone(),
                source,
            })?;

        match res.status().as_u16() {
            403 => tracing::error!(
                "Cannot access file {} (403); was it selected through the picker?",
                file_id
            ),
            404 => tracing::error!(
                "File {} not found; it may have been deleted or moved",
                file_id
            ),
            _ => {}
        }

        let res = check_status(res, &url).await?;
        res.json().await.map_err(|source| UploaderError::Network { url, source })
    }

    /// Downloads the raw video bytes. Media downloads flake under load, so
    /// 5xx/429 and connect/timeout failures are retried with exponential
    /// back-off; 401/403/404 are permanent (401 is left for the auto-reauth
    /// wrapper around the whole upload operation).
    pub async fn get_file_bytes(
        &self,
        access_token: &str,
        file_id: &str,
    ) -> Result<Vec<u8>, UploaderError> {
        let url = format!("{}/files/{}?alt=media", self.base_url, file_id);

        let backoff_config = ExponentialBackoff {
            initial_interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            randomization_factor: 0.0,
            max_elapsed_time: Some(Duration::from_secs(60)),
            ..Default::default()
        };

        let operation = || async {
            let res = self
                .http
                .get(&url)
                .header(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", access_token),
                )
                .send()
                .await
                .map_err(|source| {
                    // connection hiccups are worth another try
                    let transient = source.is_connect() || source.is_timeout();
                    let err = UploaderError::Network {
                        url: url.clone(),
                        source,
                    };
                    if transient {
                        tracing::warn!("Drive media fetch connection error; retrying");
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })?;

            let status = res.status();
            if status.is_success() {
                let bytes = res.bytes().await.map_err(|source| {
                    backoff::Error::permanent(UploaderError::Network {
                        url: url.clone(),
                        source,
                    })
                })?;
                return Ok(bytes.to_vec());
            }

            let code = status.as_u16();
            let body = res.text().await.unwrap_or_default();
            let err = UploaderError::Api {
                status: code,
                url: url.clone(),
                body,
            };
            if status.is_server_error() || code == 429 {
                tracing::warn!("Drive media fetch got {}; retrying", code);
                Err(backoff::Error::transient(err))
            } else {
                Err(backoff::Error::permanent(err))
            }
        };

        let bytes = backoff::future::retry(backoff_config, operation).await?;
        tracing::debug!("Downloaded {} bytes from Drive file {}", bytes.len(), file_id);
        Ok(bytes)
    }
}
