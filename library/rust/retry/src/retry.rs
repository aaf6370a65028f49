use crate::error::RetryError;
use crate::policy::RetryConfig;
use std::future::Future;

/// should_retry が true を返すエラーのみ再試行する。
/// max_attempts が 0 の場合も最低 1 回は実行する。
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempt += 1;
                if !should_retry(&e) {
                    return Err(RetryError::Aborted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                tracing::warn!("リトライ試行 {}/{}: {}", attempt, max_attempts, e);
                if attempt >= max_attempts {
                    return Err(RetryError::ExhaustedRetries {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                tokio::time::sleep(config.compute_delay(attempt - 1)).await;
            }
        }
    }
}
