use serde_json::Value;

use crate::domain::entity::request::{DirectRequest, InboundRequest, RequestBody};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "authorization";
const TOKEN_FIELD: &str = "token";

/// ExtractError はトークン探索中に発生したエラー。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("request body is not valid JSON: {0}")]
    UnreadableBody(String),
}

/// CredentialExtractor はリクエストからトークン文字列を取り出す。
///
/// - Authorizer: authorizationToken のみ参照し、`Bearer ` があれば取り除く
/// - Direct: Authorization ヘッダー (Bearer) → body.token → query.token の順で最初に見つかったもの
///
/// 空文字列はどの経路でも「未指定」として扱う。
pub struct CredentialExtractor;

impl CredentialExtractor {
    pub fn extract(request: &InboundRequest) -> Result<Option<String>, ExtractError> {
        match request {
            InboundRequest::Authorizer(event) => Ok(event
                .authorization_token
                .as_deref()
                .map(|raw| raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw))
                .and_then(non_empty)),
            InboundRequest::Direct(direct) => Self::extract_direct(direct),
        }
    }

    fn extract_direct(request: &DirectRequest) -> Result<Option<String>, ExtractError> {
        // 1. Authorization ヘッダー
        if let Some(token) = request
            .header(AUTHORIZATION_HEADER)
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .and_then(non_empty)
        {
            return Ok(Some(token));
        }

        // 2. body の token フィールド
        if let Some(body) = &request.body {
            if let Some(token) = token_from_body(body)? {
                return Ok(Some(token));
            }
        }

        // 3. token クエリパラメータ
        Ok(request.query_param(TOKEN_FIELD).and_then(non_empty))
    }
}

fn token_from_body(body: &RequestBody) -> Result<Option<String>, ExtractError> {
    match body {
        RequestBody::Raw(raw) => {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            let value: Value = serde_json::from_str(raw)
                .map_err(|e| ExtractError::UnreadableBody(e.to_string()))?;
            Ok(token_field(&value))
        }
        RequestBody::Structured(value) => Ok(token_field(value)),
    }
}

fn token_field(value: &Value) -> Option<String> {
    value
        .get(TOKEN_FIELD)
        .and_then(Value::as_str)
        .and_then(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::request::AuthorizerEvent;
    use serde_json::json;

    fn authorizer(token: Option<&str>) -> InboundRequest {
        InboundRequest::Authorizer(AuthorizerEvent {
            event_type: "TOKEN".to_string(),
            authorization_token: token.map(str::to_string),
            method_arn: "arn:aws:execute-api:sa-east-1:1:api/prod/GET/x".to_string(),
        })
    }

    fn direct(
        headers: &[(&str, &str)],
        body: Option<RequestBody>,
        query: &[(&str, &str)],
    ) -> InboundRequest {
        fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
            items
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        }
        InboundRequest::Direct(DirectRequest {
            headers: pairs(headers),
            body,
            query: pairs(query),
        })
    }

    #[test]
    fn test_authorizer_strips_bearer() {
        let token = CredentialExtractor::extract(&authorizer(Some("Bearer abc.def.ghi"))).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_authorizer_uses_whole_value_without_prefix() {
        let token = CredentialExtractor::extract(&authorizer(Some("abc.def.ghi"))).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_authorizer_prefix_is_case_sensitive() {
        let token = CredentialExtractor::extract(&authorizer(Some("bearer abc"))).unwrap();
        assert_eq!(token.as_deref(), Some("bearer abc"));
    }

    #[test]
    fn test_authorizer_empty_or_absent_is_missing() {
        assert_eq!(CredentialExtractor::extract(&authorizer(None)).unwrap(), None);
        assert_eq!(CredentialExtractor::extract(&authorizer(Some(""))).unwrap(), None);
        assert_eq!(
            CredentialExtractor::extract(&authorizer(Some("Bearer "))).unwrap(),
            None
        );
    }

    #[test]
    fn test_header_beats_body_and_query() {
        let req = direct(
            &[("Authorization", "Bearer from-header")],
            Some(RequestBody::Structured(json!({"token": "from-body"}))),
            &[("token", "from-query")],
        );
        assert_eq!(
            CredentialExtractor::extract(&req).unwrap().as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let req = direct(&[("authorization", "Bearer lower")], None, &[]);
        assert_eq!(
            CredentialExtractor::extract(&req).unwrap().as_deref(),
            Some("lower")
        );
    }

    #[test]
    fn test_non_bearer_header_falls_through_to_body() {
        let req = direct(
            &[("Authorization", "Basic dXNlcjpwYXNz")],
            Some(RequestBody::Raw(r#"{"token":"from-body"}"#.to_string())),
            &[],
        );
        assert_eq!(
            CredentialExtractor::extract(&req).unwrap().as_deref(),
            Some("from-body")
        );
    }

    #[test]
    fn test_body_beats_query() {
        let req = direct(
            &[],
            Some(RequestBody::Raw(r#"{"token":"from-body"}"#.to_string())),
            &[("token", "from-query")],
        );
        assert_eq!(
            CredentialExtractor::extract(&req).unwrap().as_deref(),
            Some("from-body")
        );
    }

    #[test]
    fn test_query_used_last() {
        let req = direct(
            &[],
            Some(RequestBody::Structured(json!({"other": 1}))),
            &[("token", "from-query")],
        );
        assert_eq!(
            CredentialExtractor::extract(&req).unwrap().as_deref(),
            Some("from-query")
        );
    }

    #[test]
    fn test_empty_sources_are_absent() {
        let req = direct(
            &[("Authorization", "Bearer ")],
            Some(RequestBody::Structured(json!({"token": ""}))),
            &[("token", "")],
        );
        assert_eq!(CredentialExtractor::extract(&req).unwrap(), None);
    }

    #[test]
    fn test_non_string_token_field_is_absent() {
        let req = direct(
            &[],
            Some(RequestBody::Structured(json!({"token": 123}))),
            &[],
        );
        assert_eq!(CredentialExtractor::extract(&req).unwrap(), None);
    }

    #[test]
    fn test_unreadable_raw_body() {
        let req = direct(&[], Some(RequestBody::Raw("{not json".to_string())), &[]);
        assert!(matches!(
            CredentialExtractor::extract(&req),
            Err(ExtractError::UnreadableBody(_))
        ));
    }

    #[test]
    fn test_unreadable_body_ignored_when_header_present() {
        let req = direct(
            &[("Authorization", "Bearer from-header")],
            Some(RequestBody::Raw("{not json".to_string())),
            &[],
        );
        assert_eq!(
            CredentialExtractor::extract(&req).unwrap().as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_blank_raw_body_is_absent() {
        let req = direct(&[], Some(RequestBody::Raw("  ".to_string())), &[]);
        assert_eq!(CredentialExtractor::extract(&req).unwrap(), None);
    }
}
