use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::entity::customer::{has_cpf_length, Customer};
use crate::domain::repository::CustomerRepository;

/// CustomerServiceConfig は顧客サービス接続の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerServiceConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

/// HttpCustomerRepository は顧客サービスの REST API から顧客を取得する。
pub struct HttpCustomerRepository {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpCustomerRepository {
    pub fn new(config: &CustomerServiceConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.url)
            .with_context(|| format!("invalid customer service url: {}", config.url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("customer service url cannot be a base: {}", config.url);
        }
        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// CPF は 1 つのパスセグメントとしてエスケープする。
    fn customer_url(&self, cpf: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v1", "customers"])
                .push(cpf);
        }
        url
    }
}

#[async_trait]
impl CustomerRepository for HttpCustomerRepository {
    async fn find_by_cpf(&self, cpf: &str) -> anyhow::Result<Option<Customer>> {
        if !has_cpf_length(cpf) {
            return Ok(None);
        }

        let url = self.customer_url(cpf);
        let resp = self.http_client.get(url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let customer: Customer = resp.error_for_status()?.json().await?;
        Ok(Some(customer))
    }
}
