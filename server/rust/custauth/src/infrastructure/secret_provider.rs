use std::sync::Arc;

use async_trait::async_trait;
use custauth_retry::{with_retry_if, RetryConfig, RetryError};
use custauth_secretstore::{SecretStore, SecretStoreError};
use secrecy::SecretString;

use super::{SecretError, SecretProvider};
use crate::domain::entity::secret::SigningSecret;

/// シークレット JSON 内で署名鍵を保持するフィールド名。
pub const JWT_SECRET_KEY: &str = "jwt_secret";

/// StoreSecretProvider はシークレットストアから署名鍵を取得する。
///
/// 一時的な障害は RetryConfig に従って再試行する。
/// 再試行が尽きた場合、fallback が設定されていればそれを使い、なければ失敗する。
pub struct StoreSecretProvider {
    store: Arc<dyn SecretStore>,
    retry: RetryConfig,
    fallback: Option<SecretString>,
}

impl StoreSecretProvider {
    pub fn new(store: Arc<dyn SecretStore>, retry: RetryConfig) -> Self {
        Self {
            store,
            retry,
            fallback: None,
        }
    }

    /// ストア障害時に使うローカルの署名鍵を設定する。
    pub fn with_fallback(mut self, fallback: SecretString) -> Self {
        self.fallback = Some(fallback);
        self
    }

    async fn fetch(&self, name: &str) -> Result<SigningSecret, SecretStoreError> {
        let value = with_retry_if(
            &self.retry,
            || self.store.get_secret_value(name, JWT_SECRET_KEY),
            SecretStoreError::is_transient,
        )
        .await
        .map_err(|e: RetryError<SecretStoreError>| {
            tracing::debug!(
                secret_name = %name,
                attempts = e.attempts(),
                "シークレットストアへの問い合わせを打ち切りました"
            );
            e.into_last_error()
        })?;

        SigningSecret::new(value)
            .ok_or_else(|| SecretStoreError::InvalidFormat(format!("{name}: empty signing secret")))
    }
}

#[async_trait]
impl SecretProvider for StoreSecretProvider {
    async fn resolve(&self, name: &str) -> Result<SigningSecret, SecretError> {
        let err = match self.fetch(name).await {
            Ok(secret) => return Ok(secret),
            Err(e) => e,
        };

        if let Some(secret) = self.fallback.clone().and_then(SigningSecret::new) {
            tracing::warn!(
                secret_name = %name,
                error = %err,
                "シークレットストアから署名鍵を取得できないため、フォールバック値を使用します"
            );
            return Ok(secret);
        }

        tracing::error!(secret_name = %name, error = %err, "署名鍵の取得に失敗しました");
        Err(SecretError::Unavailable {
            name: name.to_string(),
            reason: err.to_string(),
        })
    }
}

/// StaticSecretProvider はローカルに設定された署名鍵だけを返す。
/// シークレットストアを持たない環境でフォールバックが明示的に有効な場合に使う。
pub struct StaticSecretProvider {
    secret: SecretString,
}

impl StaticSecretProvider {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn resolve(&self, name: &str) -> Result<SigningSecret, SecretError> {
        SigningSecret::new(self.secret.clone()).ok_or_else(|| {
            tracing::error!(secret_name = %name, "ローカルの署名鍵が空です");
            SecretError::Unavailable {
                name: name.to_string(),
                reason: "local signing secret is empty".to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custauth_secretstore::{InMemorySecretStore, MockSecretStore};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_retry(attempts: u32) -> RetryConfig {
        RetryConfig::new(attempts)
            .with_initial_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    #[tokio::test]
    async fn test_resolve_from_store() {
        let store = InMemorySecretStore::new();
        store.put_secret("custauth/jwt", r#"{"jwt_secret":"from-store"}"#);
        let provider = StoreSecretProvider::new(Arc::new(store), fast_retry(3));

        let secret = provider.resolve("custauth/jwt").await.unwrap();
        assert_eq!(secret.as_bytes(), b"from-store");
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut mock = MockSecretStore::new();
        mock.expect_get_secret_value().returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SecretStoreError::Timeout)
            } else {
                Ok(SecretString::new("after-retry".to_string()))
            }
        });
        let provider = StoreSecretProvider::new(Arc::new(mock), fast_retry(3));

        let secret = provider.resolve("custauth/jwt").await.unwrap();
        assert_eq!(secret.as_bytes(), b"after-retry");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let mut mock = MockSecretStore::new();
        mock.expect_get_secret_value()
            .times(1)
            .returning(|name, _| Err(SecretStoreError::NotFound(name.to_string())));
        let provider = StoreSecretProvider::new(Arc::new(mock), fast_retry(3));

        let result = provider.resolve("custauth/jwt").await;
        assert!(matches!(result, Err(SecretError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_fails_closed_without_fallback() {
        let mut mock = MockSecretStore::new();
        mock.expect_get_secret_value()
            .times(2)
            .returning(|_, _| Err(SecretStoreError::ServerError("503".to_string())));
        let provider = StoreSecretProvider::new(Arc::new(mock), fast_retry(2));

        let err = provider.resolve("custauth/jwt").await.unwrap_err();
        assert!(err.to_string().contains("custauth/jwt"));
    }

    #[tokio::test]
    async fn test_fallback_used_after_retries_exhausted() {
        let mut mock = MockSecretStore::new();
        mock.expect_get_secret_value()
            .returning(|_, _| Err(SecretStoreError::ServerError("503".to_string())));
        let provider = StoreSecretProvider::new(Arc::new(mock), fast_retry(2))
            .with_fallback(SecretString::new("local-fallback".to_string()));

        let secret = provider.resolve("custauth/jwt").await.unwrap();
        assert_eq!(secret.as_bytes(), b"local-fallback");
    }

    #[tokio::test]
    async fn test_empty_store_value_uses_fallback() {
        let store = InMemorySecretStore::new();
        store.put_secret("custauth/jwt", r#"{"jwt_secret":""}"#);
        let provider = StoreSecretProvider::new(Arc::new(store), fast_retry(1))
            .with_fallback(SecretString::new("local-fallback".to_string()));

        let secret = provider.resolve("custauth/jwt").await.unwrap();
        assert_eq!(secret.as_bytes(), b"local-fallback");
    }

    #[tokio::test]
    async fn test_empty_fallback_is_ignored() {
        let store = InMemorySecretStore::new();
        let provider = StoreSecretProvider::new(Arc::new(store), fast_retry(1))
            .with_fallback(SecretString::new(String::new()));

        assert!(provider.resolve("custauth/jwt").await.is_err());
    }

    #[tokio::test]
    async fn test_static_provider_returns_local_secret() {
        let provider = StaticSecretProvider::new(SecretString::new("local-only".to_string()));

        let secret = provider.resolve("custauth/jwt").await.unwrap();
        assert_eq!(secret.as_bytes(), b"local-only");
    }

    #[tokio::test]
    async fn test_static_provider_rejects_empty_secret() {
        let provider = StaticSecretProvider::new(SecretString::new(String::new()));

        let err = provider.resolve("custauth/jwt").await.unwrap_err();
        assert!(err.to_string().contains("custauth/jwt"));
    }
}
