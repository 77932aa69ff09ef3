// src/error.rs

use crate::storage::StorageError;
use thiserror::Error;

/// Error taxonomy for the upload pipeline.
///
/// Storage failures keep their own type so a caller can tell
/// "upload succeeded but bookkeeping failed" from "upload failed".
#[derive(Error, Debug)]
pub enum UploaderError {
    #[error("user closed the consent window before granting access")]
    AuthCancelled,

    #[error("could not parse OAuth redirect: {0}")]
    AuthParse(String),

    #[error("no cached token available and interactive auth is disabled")]
    NoToken,

    #[error("authentication expired and re-authentication did not help")]
    AuthExpiredPermanently,

    #[error("network error while calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API responded {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to serialize request body for {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resumable upload session did not return a Location header")]
    MissingSessionUrl,

    #[error("failed to create playlist {name:?}: {source}")]
    PlaylistCreation {
        name: String,
        #[source]
        source: Box<UploaderError>,
    },

    #[error("upload failed for video {index} ({title:?}): {source}")]
    UploadTransfer {
        index: usize,
        title: String,
        #[source]
        source: Box<UploaderError>,
    },

    #[error("could not add video {index} ({title:?}) to the playlist: {source}")]
    PlaylistAttach {
        index: usize,
        title: String,
        #[source]
        source: Box<UploaderError>,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl UploaderError {
    /// HTTP status carried by this error, looking through the batch-level
    /// wrappers so a 401 stays detectable end-to-end.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploaderError::Api { status, .. } => Some(*status),
            UploaderError::PlaylistCreation { source, .. }
            | UploaderError::UploadTransfer { source, .. }
            | UploaderError::PlaylistAttach { source, .. } => source.status(),
            _ => None,
        }
    }
}
