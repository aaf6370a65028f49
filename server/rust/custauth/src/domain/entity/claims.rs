use serde::{Deserialize, Serialize};

use super::customer::Customer;

/// 発行したトークンの有効期間 (秒)。
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// クライアントへ返す有効期間の表記。
pub const TOKEN_LIFETIME_LABEL: &str = "1h";

/// CustomerIdentity はトークン発行の入力。
/// iat / exp を持たないため、呼び出し側が発行時刻を指定することはできない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<&Customer> for CustomerIdentity {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            cpf: customer.cpf.clone(),
            name: customer.name.clone(),
            email: Some(customer.email.clone()),
        }
    }
}

/// SessionClaims はトークンに埋め込まれるペイロード。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: i64,
    pub cpf: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// 発行時刻を打刻し、有効期限を iat + 1h に設定する。
    pub fn stamp(identity: &CustomerIdentity, issued_at: i64) -> Self {
        Self {
            sub: identity.id,
            cpf: identity.cpf.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        }
    }

    /// now が exp 以上なら期限切れ。
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// authorizer の principalId / userId に使う文字列表現。
    pub fn principal_id(&self) -> String {
        self.sub.to_string()
    }
}
