use std::sync::Arc;

use crate::domain::entity::outcome::{InvalidReason, ValidationOutcome};
use crate::domain::entity::request::InboundRequest;
use crate::domain::service::{CredentialExtractor, TokenCodec};
use crate::infrastructure::SecretProvider;

/// ValidateTokenUseCase は両方の検証エントリポイントが共有する検証ルーチン。
///
/// トークン抽出 → 署名鍵の解決 → 署名・有効期限の検証 の順に進み、
/// どの段階で止まっても ValidationOutcome を返す。
pub struct ValidateTokenUseCase {
    secrets: Arc<dyn SecretProvider>,
    secret_name: String,
    codec: TokenCodec,
}

impl ValidateTokenUseCase {
    pub fn new(secrets: Arc<dyn SecretProvider>, secret_name: impl Into<String>) -> Self {
        Self {
            secrets,
            secret_name: secret_name.into(),
            codec: TokenCodec::new(),
        }
    }

    pub async fn execute(&self, request: &InboundRequest) -> ValidationOutcome {
        let token = match CredentialExtractor::extract(request) {
            Ok(Some(token)) => token,
            Ok(None) => return ValidationOutcome::Invalid(InvalidReason::Missing),
            Err(e) => return ValidationOutcome::Invalid(InvalidReason::Rejected(e.to_string())),
        };

        // 署名鍵が取れない場合は fail-closed
        let secret = match self.secrets.resolve(&self.secret_name).await {
            Ok(secret) => secret,
            Err(e) => return ValidationOutcome::Invalid(InvalidReason::Rejected(e.to_string())),
        };

        let outcome = self.codec.verify(&token, &secret);
        if let ValidationOutcome::Invalid(reason) = &outcome {
            tracing::debug!(reason = reason.label(), "トークン検証に失敗しました");
        }
        outcome
    }
}
