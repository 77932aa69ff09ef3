// src/reauth.rs

use crate::auth::AuthGateway;
use crate::error::UploaderError;
use std::future::Future;

/// Runs a token-taking async operation with a single transparent
/// re-authentication: on an error carrying HTTP status 401, the cached
/// token is invalidated, a fresh one acquired, and the operation called
/// exactly once more. Any other failure, or a failure of the retry itself,
/// propagates unmodified.
///
/// One reusable policy instead of per-call-site 401 handling; it also
/// covers multi-request operations (session init + download + transfer)
/// that a per-request wrapper cannot retry end-to-end.
pub async fn with_auto_reauth<T, F, Fut>(
    auth: &AuthGateway,
    mut operation: F,
) -> Result<T, UploaderError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, UploaderError>>,
{
    let token = auth.get_access_token(true).await?;
    match operation(token.secret).await {
        Ok(value) => Ok(value),
        Err(err) if err.status() == Some(401) => {
            tracing::warn!("Operation got 401; re-authenticating and retrying once");
            auth.invalidate().await?;
            let fresh = auth.get_access_token(true).await?;
            operation(fresh.secret).await
        }
        Err(err) => Err(err),
    }
}
