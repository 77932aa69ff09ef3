// src/test_support.rs
// Shared fixtures for the in-module tests: a scripted consent flow, gateway
// builders, and a helper to serve an axum router on an ephemeral port.

use crate::auth::{AuthGateway, ConsentFlow};
use crate::config::{default_scopes, UploaderConfig};
use crate::error::UploaderError;
use crate::storage::MemoryStore;
use crate::token_store::TokenStore;
use async_trait::async_trait;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

enum ConsentMode {
    Grant,
    Cancel,
    Garbage,
}

/// Scripted consent window. In Grant mode each launch mints a new token
/// (`token-0`, `token-1`, ...) so tests can observe re-authentication.
pub struct StubConsent {
    mode: ConsentMode,
    pub launches: AtomicUsize,
}

impl StubConsent {
    pub fn granting() -> Arc<Self> {
        Arc::new(Self {
            mode: ConsentMode::Grant,
            launches: AtomicUsize::new(0),
        })
    }

    pub fn cancelling() -> Arc<Self> {
        Arc::new(Self {
            mode: ConsentMode::Cancel,
            launches: AtomicUsize::new(0),
        })
    }

    pub fn garbage() -> Arc<Self> {
        Arc::new(Self {
            mode: ConsentMode::Garbage,
            launches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ConsentFlow for StubConsent {
    async fn launch_interactive_auth(
        &self,
        _auth_url: &str,
    ) -> Result<Option<String>, UploaderError> {
        let n = self.launches.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ConsentMode::Grant => Ok(Some(format!(
                "https://app.example/cb#access_token=token-{}&expires_in=3599",
                n
            ))),
            ConsentMode::Cancel => Ok(None),
            ConsentMode::Garbage => Ok(Some("https://app.example/cb#error=access_denied".to_string())),
        }
    }
}

pub fn test_config() -> UploaderConfig {
    UploaderConfig {
        client_id: "test-client".to_string(),
        redirect_uri: "https://app.example/cb".to_string(),
        scopes: default_scopes(),
        drive_base_url: "http://unused.invalid/drive/v3".to_string(),
        youtube_base_url: "http://unused.invalid/youtube/v3".to_string(),
        youtube_upload_base_url: "http://unused.invalid/upload/youtube/v3".to_string(),
    }
}

/// Gateway backed by a fresh in-memory token store.
pub fn gateway_with(consent: Arc<StubConsent>) -> (AuthGateway, TokenStore) {
    let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
    let gateway = gateway_with_store(consent, tokens.clone());
    (gateway, tokens)
}

/// Gateway over a caller-supplied token store, for tests that share one
/// storage area between tokens and results.
pub fn gateway_with_store(consent: Arc<StubConsent>, tokens: TokenStore) -> AuthGateway {
    AuthGateway::new(tokens, consent, Arc::new(test_config()))
}

/// Serves `app` on 127.0.0.1:0 and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    base
}
