use super::claims::SessionClaims;

/// ValidationOutcome は検証ルーチンが必ず返す結果。
/// エントリポイントごとの違いは、この値の表示方法だけにある。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(SessionClaims),
    Invalid(InvalidReason),
}

/// InvalidReason はトークンを受け入れなかった理由。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// どこからもトークンが見つからなかった。
    Missing,
    /// 署名は正しいが有効期限を過ぎている。
    Expired,
    /// 署名不一致、構造の破損、許可されていないアルゴリズム。
    Malformed(String),
    /// 上記以外 (リクエストボディが読めない、署名鍵が取得できない等)。
    Rejected(String),
}

impl InvalidReason {
    /// ログ出力用の短いラベル。
    pub fn label(&self) -> &'static str {
        match self {
            InvalidReason::Missing => "missing",
            InvalidReason::Expired => "expired",
            InvalidReason::Malformed(_) => "malformed",
            InvalidReason::Rejected(_) => "rejected",
        }
    }
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}
