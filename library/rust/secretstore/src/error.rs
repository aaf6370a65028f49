use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("シークレットが見つかりません: {0}")]
    NotFound(String),
    #[error("権限が拒否されました: {0}")]
    PermissionDenied(String),
    #[error("シークレットの形式が不正です: {0}")]
    InvalidFormat(String),
    #[error("サーバーエラー: {0}")]
    ServerError(String),
    #[error("タイムアウト")]
    Timeout,
    #[error("接続設定が不正です: {0}")]
    InvalidConfig(String),
}

impl SecretStoreError {
    /// 再試行で回復する見込みがあるかどうか。
    /// NotFound / PermissionDenied / InvalidFormat は何度問い合わせても結果が変わらない。
    pub fn is_transient(&self) -> bool {
        matches!(self, SecretStoreError::ServerError(_) | SecretStoreError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(SecretStoreError::ServerError("502".to_string()).is_transient());
        assert!(SecretStoreError::Timeout.is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(!SecretStoreError::NotFound("jwt".to_string()).is_transient());
        assert!(!SecretStoreError::PermissionDenied("jwt".to_string()).is_transient());
        assert!(!SecretStoreError::InvalidFormat("jwt".to_string()).is_transient());
        assert!(!SecretStoreError::InvalidConfig("url".to_string()).is_transient());
    }
}
