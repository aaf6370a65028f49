use async_trait::async_trait;

use crate::domain::entity::customer::Customer;

/// CustomerRepository は CPF から顧客レコードを引くためのリポジトリトレイト。
/// 実装は外部の顧客サービス、またはローカル実行用のスタブ。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 見つからない場合は Ok(None)。ストアに到達できない場合のみ Err を返す。
    /// 11 文字でない CPF は問い合わせずに Ok(None) を返す。
    async fn find_by_cpf(&self, cpf: &str) -> anyhow::Result<Option<Customer>>;
}
