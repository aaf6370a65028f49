pub mod event_handler;
pub mod token_handler;

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::domain::repository::CustomerRepository;
use crate::infrastructure::SecretProvider;
use crate::usecase::{IssueTokenUseCase, ValidateTokenUseCase};

/// AppState はアプリケーション全体の共有状態を表す。
/// 保持するのは不変のコラボレータのみで、リクエスト間で状態を共有しない。
#[derive(Clone)]
pub struct AppState {
    pub issue_token_uc: Arc<IssueTokenUseCase>,
    pub validate_token_uc: Arc<ValidateTokenUseCase>,
}

impl AppState {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        secrets: Arc<dyn SecretProvider>,
        secret_name: impl Into<String>,
    ) -> Self {
        let secret_name = secret_name.into();
        Self {
            issue_token_uc: Arc::new(IssueTokenUseCase::new(
                customers,
                secrets.clone(),
                secret_name.clone(),
            )),
            validate_token_uc: Arc::new(ValidateTokenUseCase::new(secrets, secret_name)),
        }
    }
}

/// Build the REST API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(token_handler::healthz))
        .route("/auth", post(token_handler::issue_token))
        .route(
            "/validate",
            get(token_handler::validate_query).post(token_handler::validate_body),
        )
        .route("/authorize", post(token_handler::authorize))
        .route("/events/validate", post(event_handler::handle_event))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// ヘッダーを (名前, 値) の組に変換する。UTF-8 でない値は捨てる。
pub(crate) fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
