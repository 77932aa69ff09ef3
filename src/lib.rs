//! Batch uploader for Google Drive videos into YouTube playlists.
//!
//! The pipeline creates a playlist, then for each picked Drive file opens a
//! resumable YouTube upload session, streams the bytes across, and attaches
//! the resulting video to the playlist. All Google API traffic goes through
//! a resilient HTTP layer that re-authenticates once on 401 and backs off
//! on transient server errors; completed uploads are persisted as
//! `{title, id}` pairs for later reuse.

pub mod auth;
pub mod client;
pub mod config;
pub mod drive_client;
pub mod error;
pub mod orchestrator;
pub mod reauth;
pub mod result_store;
pub mod storage;
pub mod token_store;
pub mod types;
pub mod youtube_client;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{parse_redirect_fragment, AuthGateway, ConsentFlow};
pub use client::{RequestOptions, ResilientClient};
pub use config::{default_scopes, UploaderConfig};
pub use drive_client::{DriveClient, DriveFile};
pub use error::UploaderError;
pub use orchestrator::{BatchUploadOrchestrator, PersistMode};
pub use reauth::with_auto_reauth;
pub use result_store::ResultStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use token_store::{AccessToken, TokenStore};
pub use types::{
    build_video_description, effective_title, BatchJob, ProgressEvent, ProgressPhase, UploadItem,
    UploadResult,
};
pub use youtube_client::{UploadedVideo, YouTubeClient};
