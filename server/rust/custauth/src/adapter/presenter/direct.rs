use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::entity::claims::SessionClaims;
use crate::domain::entity::outcome::{InvalidReason, ValidationOutcome};

pub const MISSING_ERROR: &str = "Token ausente";
pub const MISSING_MESSAGE: &str =
    "Token deve ser fornecido no header Authorization (Bearer), body ou query parameter";
pub const EXPIRED_ERROR: &str = "Token expirado";
pub const MALFORMED_ERROR: &str = "Token malformado";
pub const REJECTED_ERROR: &str = "Token inválido";
pub const VALID_MESSAGE: &str = "Token válido";

#[derive(Debug, Serialize)]
struct ValidBody<'a> {
    valid: bool,
    decoded: &'a SessionClaims,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct MissingBody {
    valid: bool,
    error: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct InvalidBody<'a> {
    valid: bool,
    error: &'static str,
    details: &'a str,
}

/// present は ValidationOutcome を直接検証 API のステータスと JSON に変換する。
pub fn present(outcome: &ValidationOutcome) -> Response {
    match outcome {
        ValidationOutcome::Valid(claims) => (
            StatusCode::OK,
            Json(ValidBody {
                valid: true,
                decoded: claims,
                message: VALID_MESSAGE,
            }),
        )
            .into_response(),
        ValidationOutcome::Invalid(InvalidReason::Missing) => (
            StatusCode::BAD_REQUEST,
            Json(MissingBody {
                valid: false,
                error: MISSING_ERROR,
                message: MISSING_MESSAGE,
            }),
        )
            .into_response(),
        ValidationOutcome::Invalid(InvalidReason::Expired) => invalid(EXPIRED_ERROR, "jwt expired"),
        ValidationOutcome::Invalid(InvalidReason::Malformed(detail)) => {
            invalid(MALFORMED_ERROR, detail)
        }
        ValidationOutcome::Invalid(InvalidReason::Rejected(detail)) => {
            invalid(REJECTED_ERROR, detail)
        }
    }
}

fn invalid(error: &'static str, details: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(InvalidBody {
            valid: false,
            error,
            details,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_present_valid() {
        let claims = SessionClaims {
            sub: 8,
            cpf: "12345678901".to_string(),
            name: "Ana".to_string(),
            email: Some("ana@example.com".to_string()),
            iat: 100,
            exp: 3700,
        };
        let resp = present(&ValidationOutcome::Valid(claims));
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["valid"], true);
        assert_eq!(json["message"], "Token válido");
        assert_eq!(json["decoded"]["sub"], 8);
        assert_eq!(json["decoded"]["email"], "ana@example.com");
        assert_eq!(json["decoded"]["exp"], 3700);
    }

    #[tokio::test]
    async fn test_present_missing() {
        let resp = present(&ValidationOutcome::Invalid(InvalidReason::Missing));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "Token ausente");
        assert_eq!(json["message"], MISSING_MESSAGE);
    }

    #[tokio::test]
    async fn test_present_expired() {
        let resp = present(&ValidationOutcome::Invalid(InvalidReason::Expired));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "Token expirado");
        assert_eq!(json["details"], "jwt expired");
    }

    #[tokio::test]
    async fn test_present_malformed_and_rejected() {
        let resp = present(&ValidationOutcome::Invalid(InvalidReason::Malformed(
            "invalid signature".to_string(),
        )));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Token malformado");
        assert_eq!(json["details"], "invalid signature");

        let resp = present(&ValidationOutcome::Invalid(InvalidReason::Rejected(
            "store down".to_string(),
        )));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Token inválido");
    }
}
