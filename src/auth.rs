// src/auth.rs
//! Access-token lifecycle: cached token with expiry skew, or an interactive
//! implicit-grant consent flow delegated to a [`ConsentFlow`] collaborator.

use crate::config::UploaderConfig;
use crate::error::UploaderError;
use crate::token_store::{AccessToken, TokenStore};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// Tokens are considered expired this many seconds early so an in-flight
/// batch never starts a request with a token about to lapse.
pub const TOKEN_EXPIRY_SKEW_SECONDS: i64 = 60;

/// Implicit-grant responses usually carry expires_in; fall back to an hour
/// when the provider omits it.
const DEFAULT_EXPIRES_IN_SECONDS: i64 = 3600;

lazy_static! {
    static ref ACCESS_TOKEN_RE: Regex =
        Regex::new(r"[#&]access_token=([^&]+)").expect("valid regex");
    static ref EXPIRES_IN_RE: Regex = Regex::new(r"[#&]expires_in=([^&]+)").expect("valid regex");
}

/// Identity/consent collaborator. Given the authorization URL, returns the
/// redirect URL (with the token in its fragment), or `None` when the user
/// closed the consent window.
#[async_trait]
pub trait ConsentFlow: Send + Sync {
    async fn launch_interactive_auth(&self, auth_url: &str)
        -> Result<Option<String>, UploaderError>;
}

#[derive(Clone)]
pub struct AuthGateway {
    tokens: TokenStore,
    consent: Arc<dyn ConsentFlow>,
    config: Arc<UploaderConfig>,
}

impl AuthGateway {
    pub fn new(tokens: TokenStore, consent: Arc<dyn ConsentFlow>, config: Arc<UploaderConfig>) -> Self {
        Self {
            tokens,
            consent,
            config,
        }
    }

    pub fn auth_url(&self) -> String {
        format!(
            "https://accounts.google.com/o/oauth2/auth?client_id={}&response_type=token&redirect_uri={}&scope={}",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scopes.join(" ")),
        )
    }

    /// Returns a cached token while it is still valid (minus the skew),
    /// otherwise launches the interactive flow. With `interactive == false`
    /// a missing/expired token is reported as [`UploaderError::NoToken`] and
    /// the caller decides whether to prompt.
    pub async fn get_access_token(&self, interactive: bool) -> Result<AccessToken, UploaderError> {
        if let Some(token) = self.tokens.get().await? {
            if Utc::now() < token.expires_at - Duration::seconds(TOKEN_EXPIRY_SKEW_SECONDS) {
                return Ok(token);
            }
        }

        if !interactive {
            tracing::warn!("Token expired/missing and interactive mode is OFF");
            return Err(UploaderError::NoToken);
        }

        tracing::info!("🔐 Token missing or expired, starting OAuth flow");
        let redirect = self
            .consent
            .launch_interactive_auth(&self.auth_url())
            .await?
            .ok_or(UploaderError::AuthCancelled)?;

        let token = parse_redirect_fragment(&redirect)?;
        self.tokens.set(&token).await?;
        Ok(token)
    }

    /// Clears the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) -> Result<(), UploaderError> {
        Ok(self.tokens.invalidate().await?)
    }
}

/// Extracts `access_token` and `expires_in` from an implicit-grant redirect
/// fragment, e.g. `https://app/cb#access_token=ya29...&expires_in=3599`.
pub fn parse_redirect_fragment(redirect: &str) -> Result<AccessToken, UploaderError> {
    let secret = ACCESS_TOKEN_RE
        .captures(redirect)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            UploaderError::AuthParse(format!("no access_token in redirect: {}", redirect))
        })?;

    let expires_in = EXPIRES_IN_RE
        .captures(redirect)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(DEFAULT_EXPIRES_IN_SECONDS);

    Ok(AccessToken {
        secret,
        expires_at: Utc::now() + Duration::seconds(expires_in),
    })
}
