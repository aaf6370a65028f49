use async_trait::async_trait;

use crate::domain::entity::customer::{has_cpf_length, Customer};
use crate::domain::repository::CustomerRepository;

const STUB_NAME: &str = "Mario Mendonça";
const STUB_EMAIL: &str = "mario@example.com";

/// StubCustomerRepository は顧客サービスなしで動かすための固定レコード実装。
/// 11 文字の CPF なら常に同じ顧客を返し、id は現在時刻 (epoch ミリ秒) になる。
#[derive(Debug, Default)]
pub struct StubCustomerRepository;

impl StubCustomerRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CustomerRepository for StubCustomerRepository {
    async fn find_by_cpf(&self, cpf: &str) -> anyhow::Result<Option<Customer>> {
        if !has_cpf_length(cpf) {
            return Ok(None);
        }
        Ok(Some(Customer {
            id: chrono::Utc::now().timestamp_millis(),
            cpf: cpf.to_string(),
            name: STUB_NAME.to_string(),
            email: STUB_EMAIL.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_returns_fixed_customer() {
        let before = chrono::Utc::now().timestamp_millis();
        let customer = StubCustomerRepository::new()
            .find_by_cpf("12345678901")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(customer.cpf, "12345678901");
        assert_eq!(customer.name, "Mario Mendonça");
        assert_eq!(customer.email, "mario@example.com");
        assert!(customer.id >= before);
    }

    #[tokio::test]
    async fn test_stub_wrong_length() {
        let repo = StubCustomerRepository::new();
        assert!(repo.find_by_cpf("1234567890").await.unwrap().is_none());
        assert!(repo.find_by_cpf("123456789012").await.unwrap().is_none());
    }
}
