//! custauth-retry: 指数バックオフ付きリトライライブラリ。
//!
//! 外部ストアへの問い合わせなど、一時的な失敗が起こりうる非同期操作を
//! 上限付きで再試行する。

pub mod error;
pub mod policy;
pub mod retry;

pub use error::RetryError;
pub use policy::RetryConfig;
pub use retry::with_retry_if;
