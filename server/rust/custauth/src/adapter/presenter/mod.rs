//! 検証結果をエントリポイントごとのレスポンス形式へ変換する。
//! 検証ロジック自体は ValidateTokenUseCase に一本化されており、ここでは表示だけを扱う。

pub mod authorizer;
pub mod direct;

pub use authorizer::Unauthorized;
