//! custauth-secretstore: 外部シークレットストアのクライアント。
//!
//! シークレットは JSON 文字列 (`secret_string`) として保存され、
//! 利用側はその中の特定フィールド (例: `jwt_secret`) を取り出して使う。

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod secret;

pub use client::{InMemorySecretStore, SecretStore};
pub use config::SecretStoreConfig;
pub use error::SecretStoreError;
pub use http::HttpSecretStore;
pub use secret::StoredSecret;

#[cfg(feature = "mock")]
pub use client::MockSecretStore;
