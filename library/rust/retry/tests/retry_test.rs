use custauth_retry::error::RetryError;
use custauth_retry::policy::RetryConfig;
use custauth_retry::retry::with_retry_if;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fast_config(max_attempts: u32) -> RetryConfig {
    RetryConfig::new(max_attempts)
        .with_initial_delay(Duration::from_millis(1))
        .with_jitter(false)
}

// すべてのエラーを再試行対象とする。
async fn retry_always<F, Fut, T>(
    config: &RetryConfig,
    operation: F,
) -> Result<T, RetryError<String>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    with_retry_if(config, operation, |_| true).await
}

#[tokio::test]
async fn test_retry_succeeds_on_first_attempt() {
    let config = RetryConfig::new(3);
    let result: Result<&str, RetryError<String>> =
        retry_always(&config, || async { Ok("success") }).await;
    assert_eq!(result.unwrap(), "success");
}

#[tokio::test]
async fn test_retry_succeeds_on_third_attempt() {
    let counter = Arc::new(AtomicU32::new(0));
    let config = fast_config(3);

    let counter_clone = counter.clone();
    let result: Result<&str, RetryError<String>> = retry_always(&config, move || {
        let c = counter_clone.clone();
        async move {
            let attempt = c.fetch_add(1, Ordering::SeqCst);
            if attempt < 2 {
                Err("not yet".to_string())
            } else {
                Ok("success")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "success");
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_exhausted() {
    let config = fast_config(3);

    let result: Result<&str, RetryError<String>> =
        retry_always(&config, || async { Err("always fails".to_string()) }).await;

    match result {
        Err(RetryError::ExhaustedRetries {
            attempts,
            last_error,
        }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last_error, "always fails");
        }
        _ => panic!("ExhaustedRetries エラーが期待される"),
    }
}

#[tokio::test]
async fn test_retry_zero_attempts_still_runs_once() {
    let counter = Arc::new(AtomicU32::new(0));
    let config = fast_config(0);

    let counter_clone = counter.clone();
    let result: Result<(), RetryError<String>> = retry_always(&config, move || {
        let c = counter_clone.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            Err("boom".to_string())
        }
    })
    .await;

    assert_eq!(result.unwrap_err().attempts(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_if_aborts_on_permanent_error() {
    let counter = Arc::new(AtomicU32::new(0));
    let config = fast_config(5);

    let counter_clone = counter.clone();
    let result: Result<(), RetryError<String>> = with_retry_if(
        &config,
        move || {
            let c = counter_clone.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("not found".to_string())
            }
        },
        |e| e != "not found",
    )
    .await;

    match result {
        Err(RetryError::Aborted {
            attempts,
            last_error,
        }) => {
            assert_eq!(attempts, 1);
            assert_eq!(last_error, "not found");
        }
        _ => panic!("Aborted エラーが期待される"),
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_into_last_error() {
    let config = fast_config(2);
    let result: Result<(), RetryError<String>> =
        retry_always(&config, || async { Err("last".to_string()) }).await;
    assert_eq!(result.unwrap_err().into_last_error(), "last");
}
