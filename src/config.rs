// src/config.rs

/// Runtime configuration. Base URLs exist so tests can point the clients
/// at a local mock API.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub drive_base_url: String,
    pub youtube_base_url: String,
    pub youtube_upload_base_url: String,
}

impl UploaderConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            client_id: std::env::var("GOOGLE_OAUTH_CLIENT_ID").unwrap_or_default(),
            redirect_uri: std::env::var("GOOGLE_OAUTH_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:3000/oauth/callback".to_string()),
            scopes: default_scopes(),
            drive_base_url: std::env::var("GOOGLE_DRIVE_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".to_string()),
            youtube_base_url: std::env::var("GOOGLE_YOUTUBE_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string()),
            youtube_upload_base_url: std::env::var("GOOGLE_YOUTUBE_UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/upload/youtube/v3".to_string()),
        }
    }
}

/// Read access to the user's picked Drive files, write access to uploads
/// and playlists.
pub fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/drive.file".to_string(),
        "https://www.googleapis.com/auth/youtube.force-ssl".to_string(),
    ]
}
