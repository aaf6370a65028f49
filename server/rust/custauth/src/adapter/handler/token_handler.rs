use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::{header_pairs, AppState};
use crate::adapter::presenter::{authorizer, direct};
use crate::domain::entity::claims::TOKEN_LIFETIME_LABEL;
use crate::domain::entity::request::{AuthorizerEvent, DirectRequest, InboundRequest, RequestBody};
use crate::usecase::{IssueTokenError, IssuedToken};

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueTokenResponse {
    token: String,
    customer: CustomerSummary,
    expires_in: &'static str,
}

#[derive(Debug, Serialize)]
struct CustomerSummary {
    id: i64,
    name: String,
    cpf: String,
}

impl From<IssuedToken> for IssueTokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            customer: CustomerSummary {
                id: issued.customer.id,
                name: issued.customer.name,
                cpf: issued.customer.cpf,
            },
            expires_in: TOKEN_LIFETIME_LABEL,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for IssueTokenError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            IssueTokenError::MissingCpf => (
                StatusCode::BAD_REQUEST,
                "CPF é obrigatório",
                "Campo 'cpf' deve ser fornecido no body da requisição".to_string(),
            ),
            IssueTokenError::InvalidCpf => (
                StatusCode::BAD_REQUEST,
                "CPF inválido",
                "Campo 'cpf' deve conter exatamente 11 caracteres".to_string(),
            ),
            IssueTokenError::CustomerNotFound(cpf) => (
                StatusCode::NOT_FOUND,
                "Customer não encontrado",
                format!("Nenhum customer encontrado para o CPF: {cpf}"),
            ),
            IssueTokenError::CustomerLookup(msg) => (
                StatusCode::BAD_GATEWAY,
                "Erro ao consultar customer",
                msg.clone(),
            ),
            IssueTokenError::SecretUnavailable(msg) | IssueTokenError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro interno do servidor",
                msg.clone(),
            ),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "トークン発行に失敗しました");
        }
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// POST /auth
///
/// ボディは `{"cpf": "..."}`。空ボディや JSON として読めないボディは cpf 未指定として扱う。
pub async fn issue_token(State(state): State<AppState>, body: Bytes) -> Response {
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let cpf = match parsed.get("cpf") {
        None | Some(Value::Null) => None,
        Some(Value::String(cpf)) => Some(cpf.as_str()),
        Some(_) => return IssueTokenError::InvalidCpf.into_response(),
    };

    match state.issue_token_uc.execute(cpf).await {
        Ok(issued) => (StatusCode::OK, Json(IssueTokenResponse::from(issued))).into_response(),
        Err(e) => e.into_response(),
    }
}

type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

// 解析できないクエリは無視し、ヘッダーやボディのトークンで判定を続ける
fn query_pairs(query: QueryPairs) -> Vec<(String, String)> {
    match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "クエリ文字列を解析できないため無視します");
            Vec::new()
        }
    }
}

/// GET /validate
pub async fn validate_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: QueryPairs,
) -> Response {
    let request = InboundRequest::Direct(DirectRequest {
        headers: header_pairs(&headers),
        body: None,
        query: query_pairs(query),
    });
    direct::present(&state.validate_token_uc.execute(&request).await)
}

/// POST /validate
pub async fn validate_body(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: QueryPairs,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        Some(RequestBody::Raw(String::from_utf8_lossy(&body).into_owned()))
    };
    let request = InboundRequest::Direct(DirectRequest {
        headers: header_pairs(&headers),
        body,
        query: query_pairs(query),
    });
    direct::present(&state.validate_token_uc.execute(&request).await)
}

/// POST /authorize
///
/// ゲートウェイの TOKEN authorizer イベントを受け取り、Allow ポリシーか Unauthorized を返す。
pub async fn authorize(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(event) = serde_json::from_slice::<AuthorizerEvent>(&body) else {
        tracing::warn!("authorizer イベントを解析できません");
        return authorizer::Unauthorized.into_response();
    };
    authorize_event(&state, event).await
}

pub(crate) async fn authorize_event(state: &AppState, event: AuthorizerEvent) -> Response {
    let method_arn = event.method_arn.clone();
    let outcome = state
        .validate_token_uc
        .execute(&InboundRequest::Authorizer(event))
        .await;
    match authorizer::present(outcome, &method_arn) {
        Ok(policy) => (StatusCode::OK, Json(policy)).into_response(),
        Err(unauthorized) => unauthorized.into_response(),
    }
}
