use serde::Deserialize;

/// InboundRequest は検証エントリポイントに届いたリクエスト。
/// バリアントがトークンの探索モードを決める。
#[derive(Debug, Clone)]
pub enum InboundRequest {
    /// authorizer 契約: authorizationToken だけを見る。
    Authorizer(AuthorizerEvent),
    /// 汎用 REST 検証: header → body → query の順に探す。
    Direct(DirectRequest),
}

/// AuthorizerEvent は API ゲートウェイの TOKEN authorizer イベント。
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AuthorizerEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(rename = "authorizationToken", default)]
    pub authorization_token: Option<String>,
    #[serde(rename = "methodArn", default)]
    pub method_arn: String,
}

/// DirectRequest は header / body / query を持つ一般的なリクエスト表現。
#[derive(Debug, Clone, Default)]
pub struct DirectRequest {
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub query: Vec<(String, String)>,
}

/// RequestBody は未解析の文字列か、構造化済みの JSON のどちらか。
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Raw(String),
    Structured(serde_json::Value),
}

impl DirectRequest {
    /// ヘッダー名は大文字小文字を区別せずに照合する。
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
