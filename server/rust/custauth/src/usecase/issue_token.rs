use std::sync::Arc;

use crate::domain::entity::claims::CustomerIdentity;
use crate::domain::entity::customer::{has_cpf_length, Customer};
use crate::domain::repository::CustomerRepository;
use crate::domain::service::TokenCodec;
use crate::infrastructure::SecretProvider;

/// IssueTokenError はトークン発行に関するエラー。
#[derive(Debug, thiserror::Error)]
pub enum IssueTokenError {
    #[error("cpf is required")]
    MissingCpf,

    #[error("cpf must have exactly 11 characters")]
    InvalidCpf,

    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    #[error("customer lookup failed: {0}")]
    CustomerLookup(String),

    #[error("signing secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// IssuedToken は発行結果。
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub customer: Customer,
}

/// IssueTokenUseCase は CPF から顧客を引き、セッショントークンを発行する。
pub struct IssueTokenUseCase {
    customers: Arc<dyn CustomerRepository>,
    secrets: Arc<dyn SecretProvider>,
    secret_name: String,
    codec: TokenCodec,
}

impl IssueTokenUseCase {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        secrets: Arc<dyn SecretProvider>,
        secret_name: impl Into<String>,
    ) -> Self {
        Self {
            customers,
            secrets,
            secret_name: secret_name.into(),
            codec: TokenCodec::new(),
        }
    }

    pub async fn execute(&self, cpf: Option<&str>) -> Result<IssuedToken, IssueTokenError> {
        let cpf = match cpf {
            Some(cpf) if !cpf.is_empty() => cpf,
            _ => return Err(IssueTokenError::MissingCpf),
        };
        if !has_cpf_length(cpf) {
            return Err(IssueTokenError::InvalidCpf);
        }

        let customer = self
            .customers
            .find_by_cpf(cpf)
            .await
            .map_err(|e| IssueTokenError::CustomerLookup(e.to_string()))?
            .ok_or_else(|| IssueTokenError::CustomerNotFound(cpf.to_string()))?;

        let secret = self
            .secrets
            .resolve(&self.secret_name)
            .await
            .map_err(|e| IssueTokenError::SecretUnavailable(e.to_string()))?;

        let token = self
            .codec
            .issue(&CustomerIdentity::from(&customer), &secret)
            .map_err(|e| IssueTokenError::Internal(e.to_string()))?;

        tracing::info!(
            customer_id = customer.id,
            cpf = %customer.cpf,
            "セッショントークンを発行しました"
        );

        Ok(IssuedToken { token, customer })
    }
}
