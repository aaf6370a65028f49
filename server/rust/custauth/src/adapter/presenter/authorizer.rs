use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::domain::entity::outcome::ValidationOutcome;
use crate::domain::entity::policy::AuthorizerPolicy;

/// Unauthorized は authorizer 契約における終端の拒否。
/// 拒否理由は呼び出し元に返さず、ログにのみ残す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Unauthorized",
        )
            .into_response()
    }
}

/// present は検証結果を Allow ポリシーか Unauthorized に変換する。
pub fn present(
    outcome: ValidationOutcome,
    method_arn: &str,
) -> Result<AuthorizerPolicy, Unauthorized> {
    match outcome {
        ValidationOutcome::Valid(claims) => Ok(AuthorizerPolicy::allow(&claims, method_arn)),
        ValidationOutcome::Invalid(reason) => {
            tracing::warn!(
                reason = reason.label(),
                method_arn = %method_arn,
                "authorizer がアクセスを拒否しました"
            );
            Err(Unauthorized)
        }
    }
}
