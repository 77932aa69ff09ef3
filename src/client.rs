// src/client.rs
//! Centralised Google fetch wrapper: bearer auth, one 401 retry after token
//! invalidation, exponential back-off on 5xx/429.

use crate::auth::AuthGateway;
use crate::error::UploaderError;
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
    /// Rotate the token and retry exactly once on 401. Callers that handle
    /// auth themselves opt out.
    pub retry_401: bool,
    /// Retries after the first attempt for 5xx/429 responses.
    pub backoff_attempts: u32,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            body: None,
            content_type: None,
            retry_401: true,
            backoff_attempts: 2,
        }
    }
}

#[derive(Clone)]
pub struct ResilientClient {
    http: Client,
    auth: AuthGateway,
}

impl ResilientClient {
    pub fn new(auth: AuthGateway) -> Self {
        Self {
            http: Client::new(),
            auth,
        }
    }

    pub async fn get(&self, url: &str) -> Result<Response, UploaderError> {
        self.request(Method::GET, url, RequestOptions::default()).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<Response, UploaderError> {
        let body = serde_json::to_vec(payload).map_err(|source| UploaderError::Json {
            url: url.to_string(),
            source,
        })?;
        self.request(
            Method::POST,
            url,
            RequestOptions {
                body: Some(body),
                content_type: Some("application/json".to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<Response, UploaderError> {
        // Interactive on purpose: a first-use client call may itself have
        // to trigger the consent flow.
        let mut token = self.auth.get_access_token(true).await?;
        let mut res = self.send_once(&method, url, &opts, &token.secret).await?;

        // Handle 401 once: rotate the token, retry, then give up.
        if res.status() == StatusCode::UNAUTHORIZED && opts.retry_401 {
            tracing::warn!("401 from {}; invalidating token and retrying once", url);
            self.auth.invalidate().await?;
            token = self.auth.get_access_token(true).await?;
            res = self.send_once(&method, url, &opts, &token.secret).await?;

            if res.status() == StatusCode::UNAUTHORIZED {
                tracing::error!("❌ Still 401 from {} after re-auth", url);
                return Err(UploaderError::AuthExpiredPermanently);
            }
        }

        // Handle 5xx/429 with exponential back-off: 500ms, 1s, 2s, ...
        let mut attempt: u32 = 0;
        while (res.status().is_server_error() || res.status() == StatusCode::TOO_MANY_REQUESTS)
            && attempt < opts.backoff_attempts
        {
            let wait = Duration::from_millis(2u64.pow(attempt) * 500);
            tracing::warn!(
                "{} from {}; retrying in {}ms",
                res.status(),
                url,
                wait.as_millis()
            );
            tokio::time::sleep(wait).await;
            res = self.send_once(&method, url, &opts, &token.secret).await?;
            attempt += 1;
        }

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(UploaderError::Api {
                status,
                url: url.to_string(),
                body,
            });
        }
        Ok(res)
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        opts: &RequestOptions,
        token: &str,
    ) -> Result<Response, UploaderError> {
        let mut req = self.http.request(method.clone(), url);
        for (name, value) in &opts.headers {
            req = req.header(name, value);
        }
        if let Some(content_type) = &opts.content_type {
            req = req.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = &opts.body {
            req = req.body(body.clone());
        }
        // Set last so caller-supplied headers can never override it.
        req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));

        req.send().await.map_err(|source| UploaderError::Network {
            url: url.to_string(),
            source,
        })
    }
}

/// Maps a non-2xx response to [`UploaderError::Api`], capturing the body
/// best-effort. Shared by the raw (non-wrapped) API calls.
pub(crate) async fn check_status(res: Response, url: &str) -> Result<Response, UploaderError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    Err(UploaderError::Api {
        status,
        url: url.to_string(),
        body,
    })
}
