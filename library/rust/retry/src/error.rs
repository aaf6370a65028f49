use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("すべてのリトライが失敗しました ({attempts} 回): {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: E },
    /// リトライ対象外のエラーで打ち切った。
    #[error("リトライ対象外のエラーで中断しました ({attempts} 回目): {last_error}")]
    Aborted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    /// 最後に発生したエラーを取り出す。
    pub fn into_last_error(self) -> E {
        match self {
            RetryError::ExhaustedRetries { last_error, .. }
            | RetryError::Aborted { last_error, .. } => last_error,
        }
    }

    /// 実行した試行回数。
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::ExhaustedRetries { attempts, .. }
            | RetryError::Aborted { attempts, .. } => *attempts,
        }
    }
}
