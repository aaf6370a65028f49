use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entity::claims::{CustomerIdentity, SessionClaims};
use crate::domain::entity::outcome::{InvalidReason, ValidationOutcome};
use crate::domain::entity::secret::SigningSecret;

/// TokenCodecError は署名時のエラー。検証側の失敗は ValidationOutcome で表す。
#[derive(Debug, thiserror::Error)]
pub enum TokenCodecError {
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// TokenCodec は HS256 セッショントークンの発行と検証を行う。
/// 状態を持たないため、AppState 間で共有してよい。
#[derive(Debug, Clone)]
pub struct TokenCodec {
    validation: Validation,
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCodec {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 有効期限は verify_at で leeway 0 として自前で判定する
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        // sub は数値のため、存在確認は SessionClaims のデシリアライズに任せる
        validation.set_required_spec_claims(&["exp"]);
        Self { validation }
    }

    /// 現在時刻で iat を打刻してトークンを発行する。
    pub fn issue(
        &self,
        identity: &CustomerIdentity,
        secret: &SigningSecret,
    ) -> Result<String, TokenCodecError> {
        self.issue_at(identity, secret, chrono::Utc::now().timestamp())
    }

    /// 発行時刻を指定してトークンを発行する。同じ入力なら同じトークンになる。
    pub fn issue_at(
        &self,
        identity: &CustomerIdentity,
        secret: &SigningSecret,
        issued_at: i64,
    ) -> Result<String, TokenCodecError> {
        let claims = SessionClaims::stamp(identity, issued_at);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenCodecError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str, secret: &SigningSecret) -> ValidationOutcome {
        self.verify_at(token, secret, chrono::Utc::now().timestamp())
    }

    /// 署名・構造を検証した後、now >= exp なら Expired とする。
    pub fn verify_at(&self, token: &str, secret: &SigningSecret, now: i64) -> ValidationOutcome {
        if token.is_empty() {
            return ValidationOutcome::Invalid(InvalidReason::Missing);
        }

        let decoded = match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        ) {
            Ok(data) => data,
            Err(e) => {
                return ValidationOutcome::Invalid(InvalidReason::Malformed(describe(e.kind())))
            }
        };

        if decoded.claims.is_expired_at(now) {
            return ValidationOutcome::Invalid(InvalidReason::Expired);
        }
        ValidationOutcome::Valid(decoded.claims)
    }
}

fn describe(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::InvalidSignature => "invalid signature".to_string(),
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            "invalid algorithm".to_string()
        }
        ErrorKind::MissingRequiredClaim(claim) => {
            format!("jwt missing required claim: {claim}")
        }
        ErrorKind::ExpiredSignature => "jwt expired".to_string(),
        _ => "jwt malformed".to_string(),
    }
}
