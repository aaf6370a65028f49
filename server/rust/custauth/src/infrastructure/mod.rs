pub mod config;
pub mod customer_client;
pub mod secret_provider;
pub mod stub_customer;
pub mod telemetry;

pub use customer_client::{CustomerServiceConfig, HttpCustomerRepository};
pub use secret_provider::{StaticSecretProvider, StoreSecretProvider};
pub use stub_customer::StubCustomerRepository;

use async_trait::async_trait;

use crate::domain::entity::secret::SigningSecret;

/// SecretError は署名鍵を解決できなかったことを表す。
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("signing secret '{name}' is unavailable: {reason}")]
    Unavailable { name: String, reason: String },
}

/// SecretProvider は論理名から署名鍵を解決するためのトレイト。
/// 呼び出しごとに解決し、結果をキャッシュしない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<SigningSecret, SecretError>;
}
