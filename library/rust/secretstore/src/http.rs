use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::SecretString;
use serde::Deserialize;

use crate::client::SecretStore;
use crate::config::SecretStoreConfig;
use crate::error::SecretStoreError;
use crate::secret::StoredSecret;

#[derive(Deserialize)]
struct SecretResponse {
    name: String,
    secret_string: String,
    #[serde(default)]
    version: i64,
}

/// HttpSecretStore は HTTP 経由でシークレットストアに問い合わせる実装。
/// 呼び出しごとに取得し、プロセス内にはキャッシュしない。
pub struct HttpSecretStore {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpSecretStore {
    pub fn new(config: SecretStoreConfig) -> Result<Self, SecretStoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| SecretStoreError::InvalidConfig(e.to_string()))?;
        let base_url = Url::parse(&config.server_url)
            .map_err(|e| SecretStoreError::InvalidConfig(format!("{}: {e}", config.server_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SecretStoreError::InvalidConfig(config.server_url));
        }
        Ok(Self { base_url, http })
    }

    /// シークレット名は 1 つのパスセグメントとして扱う。
    /// "custauth/jwt" のような階層名も `/` をエスケープして送る。
    fn secret_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v1", "secrets"])
                .push(name);
        }
        url
    }
}

#[async_trait]
impl SecretStore for HttpSecretStore {
    async fn get_secret(&self, name: &str) -> Result<StoredSecret, SecretStoreError> {
        let url = self.secret_url(name);
        tracing::debug!(secret_name = %name, "シークレットストアに問い合わせます");
        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SecretStoreError::Timeout
            } else {
                SecretStoreError::ServerError(e.to_string())
            }
        })?;

        match resp.status() {
            StatusCode::OK => {
                let body: SecretResponse = resp
                    .json()
                    .await
                    .map_err(|e| SecretStoreError::InvalidFormat(e.to_string()))?;
                Ok(StoredSecret {
                    name: body.name,
                    secret_string: SecretString::new(body.secret_string),
                    version: body.version,
                })
            }
            StatusCode::NOT_FOUND => Err(SecretStoreError::NotFound(name.to_string())),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                Err(SecretStoreError::PermissionDenied(name.to_string()))
            }
            status => Err(SecretStoreError::ServerError(format!(
                "unexpected status: {status}"
            ))),
        }
    }

    async fn get_secret_value(
        &self,
        name: &str,
        key: &str,
    ) -> Result<SecretString, SecretStoreError> {
        self.get_secret(name).await?.field(key)
    }
}
