use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use super::token_handler::authorize_event;
use super::AppState;
use crate::adapter::presenter::{authorizer, direct};
use crate::domain::entity::outcome::{InvalidReason, ValidationOutcome};
use crate::domain::entity::request::{AuthorizerEvent, DirectRequest, InboundRequest, RequestBody};

const TOKEN_EVENT_TYPE: &str = "TOKEN";

/// GatewayProxyEvent は API ゲートウェイのプロキシ統合イベント。
/// 検証に使うフィールドだけを取り出す。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayProxyEvent {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// ProxyEventError はプロキシイベントの body を復元できなかったことを表す。
#[derive(Debug, thiserror::Error)]
pub enum ProxyEventError {
    #[error("body is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("decoded body is not UTF-8")]
    InvalidUtf8,
}

impl GatewayProxyEvent {
    /// DirectRequest に変換する。文字列の body は未解析のまま、オブジェクトは構造化済みとして渡す。
    pub fn into_request(self) -> Result<DirectRequest, ProxyEventError> {
        let body = match self.body {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) if self.is_base64_encoded => {
                let bytes = STANDARD
                    .decode(raw.as_bytes())
                    .map_err(|e| ProxyEventError::InvalidBase64(e.to_string()))?;
                let decoded = String::from_utf8(bytes).map_err(|_| ProxyEventError::InvalidUtf8)?;
                Some(RequestBody::Raw(decoded))
            }
            Some(Value::String(raw)) => Some(RequestBody::Raw(raw)),
            Some(structured) => Some(RequestBody::Structured(structured)),
        };

        Ok(DirectRequest {
            headers: self.headers.unwrap_or_default().into_iter().collect(),
            body,
            query: self
                .query_string_parameters
                .unwrap_or_default()
                .into_iter()
                .collect(),
        })
    }
}

/// POST /events/validate
///
/// 単一の関数が受け取っていた生のゲートウェイイベントを受け付ける。
/// `type == "TOKEN"` なら authorizer 契約、それ以外はプロキシイベントとして直接検証する。
pub async fn handle_event(State(state): State<AppState>, body: Bytes) -> Response {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            return direct::present(&ValidationOutcome::Invalid(InvalidReason::Rejected(
                e.to_string(),
            )))
        }
    };

    if event.get("type").and_then(Value::as_str) == Some(TOKEN_EVENT_TYPE) {
        return match serde_json::from_value::<AuthorizerEvent>(event) {
            Ok(event) => authorize_event(&state, event).await,
            Err(e) => {
                tracing::warn!(error = %e, "authorizer イベントを解析できません");
                authorizer::Unauthorized.into_response()
            }
        };
    }

    let request = serde_json::from_value::<GatewayProxyEvent>(event)
        .map_err(|e| e.to_string())
        .and_then(|proxy| proxy.into_request().map_err(|e| e.to_string()));

    let outcome = match request {
        Ok(request) => {
            state
                .validate_token_uc
                .execute(&InboundRequest::Direct(request))
                .await
        }
        Err(detail) => ValidationOutcome::Invalid(InvalidReason::Rejected(detail)),
    };
    direct::present(&outcome)
}
