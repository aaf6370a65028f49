use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::SecretStoreError;
use crate::secret::StoredSecret;

/// SecretStore はシークレット名から値を解決するクライアントのトレイト。
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<StoredSecret, SecretStoreError>;

    /// シークレット JSON 内の 1 フィールドを取得する。
    async fn get_secret_value(&self, name: &str, key: &str)
        -> Result<SecretString, SecretStoreError>;
}

/// InMemorySecretStore はローカル実行・テスト用のインメモリ実装。
#[derive(Default)]
pub struct InMemorySecretStore {
    store: RwLock<HashMap<String, (String, i64)>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// シークレットを登録する。既存の名前なら version を 1 つ進める。
    pub fn put_secret(&self, name: impl Into<String>, secret_string: impl Into<String>) {
        let mut store = self
            .store
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let name = name.into();
        let version = store.get(&name).map_or(1, |(_, v)| v + 1);
        store.insert(name, (secret_string.into(), version));
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret(&self, name: &str) -> Result<StoredSecret, SecretStoreError> {
        let store = self
            .store
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        store
            .get(name)
            .map(|(raw, version)| StoredSecret {
                name: name.to_string(),
                secret_string: SecretString::new(raw.clone()),
                version: *version,
            })
            .ok_or_else(|| SecretStoreError::NotFound(name.to_string()))
    }

    async fn get_secret_value(
        &self,
        name: &str,
        key: &str,
    ) -> Result<SecretString, SecretStoreError> {
        self.get_secret(name).await?.field(key)
    }
}
