// src/token_store.rs

use crate::storage::{KeyValueStore, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const TOKEN_KEY: &str = "accessToken";
const EXPIRY_KEY: &str = "tokenExpiry";

/// Opaque OAuth credential plus its absolute expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

/// Persists the single live access token. No network calls; single-writer
/// assumption (two overlapping auth flows are unsupported).
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> Result<Option<AccessToken>, StorageError> {
        let secret = self.store.get(TOKEN_KEY).await?;
        let expiry = self.store.get(EXPIRY_KEY).await?;

        match (secret, expiry) {
            (Some(secret), Some(raw)) => {
                let millis: i64 = raw.parse().map_err(|_| StorageError::Corrupt {
                    key: EXPIRY_KEY.to_string(),
                    reason: format!("not a millisecond timestamp: {}", raw),
                })?;
                let expires_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                    StorageError::Corrupt {
                        key: EXPIRY_KEY.to_string(),
                        reason: format!("timestamp out of range: {}", millis),
                    }
                })?;
                Ok(Some(AccessToken { secret, expires_at }))
            }
            _ => Ok(None),
        }
    }

    /// Overwrites any previous token unconditionally.
    pub async fn set(&self, token: &AccessToken) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token.secret.clone()).await?;
        self.store
            .set(EXPIRY_KEY, token.expires_at.timestamp_millis().to_string())
            .await
    }

    pub async fn invalidate(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(EXPIRY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn store() -> TokenStore {
        TokenStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn roundtrip_preserves_secret_and_expiry() {
        let tokens = store();
        let expires_at = Utc::now() + Duration::seconds(3600);
        // storage granularity is milliseconds
        let expires_at = DateTime::<Utc>::from_timestamp_millis(expires_at.timestamp_millis())
            .expect("in range");

        tokens
            .set(&AccessToken {
                secret: "ya29.secret".to_string(),
                expires_at,
            })
            .await
            .unwrap();

        let loaded = tokens.get().await.unwrap().expect("token present");
        assert_eq!(loaded.secret, "ya29.secret");
        assert_eq!(loaded.expires_at, expires_at);
    }

    #[tokio::test]
    async fn set_overwrites_previous_token() {
        let tokens = store();
        let expires_at = Utc::now();
        tokens
            .set(&AccessToken {
                secret: "old".to_string(),
                expires_at,
            })
            .await
            .unwrap();
        tokens
            .set(&AccessToken {
                secret: "new".to_string(),
                expires_at,
            })
            .await
            .unwrap();

        assert_eq!(tokens.get().await.unwrap().unwrap().secret, "new");
    }

    #[tokio::test]
    async fn invalidate_clears_both_keys() {
        let tokens = store();
        tokens
            .set(&AccessToken {
                secret: "t".to_string(),
                expires_at: Utc::now(),
            })
            .await
            .unwrap();

        tokens.invalidate().await.unwrap();
        assert!(tokens.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_token_reads_as_none() {
        assert!(store().get().await.unwrap().is_none());
    }
}
