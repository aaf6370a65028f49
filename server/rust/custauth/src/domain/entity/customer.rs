use serde::{Deserialize, Serialize};

/// CPF の桁数。
pub const CPF_LENGTH: usize = 11;

/// Customer は顧客システムが保持する顧客レコード。
/// このサービスは発行時に読み取るだけで、所有はしない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// 長さがちょうど 11 文字かどうか。数字であるかは検証しない。
pub fn has_cpf_length(cpf: &str) -> bool {
    cpf.chars().count() == CPF_LENGTH
}
