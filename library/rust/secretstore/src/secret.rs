use secrecy::{ExposeSecret, SecretString};

use crate::error::SecretStoreError;

/// StoredSecret はストアから取得したシークレット 1 件。
/// `secret_string` は JSON オブジェクトを文字列化したもの。
#[derive(Debug)]
pub struct StoredSecret {
    pub name: String,
    pub secret_string: SecretString,
    pub version: i64,
}

impl StoredSecret {
    /// secret_string を JSON として解釈し、key に対応する文字列値を返す。
    pub fn field(&self, key: &str) -> Result<SecretString, SecretStoreError> {
        let value: serde_json::Value = serde_json::from_str(self.secret_string.expose_secret())
            .map_err(|_| {
                SecretStoreError::InvalidFormat(format!("{}: secret_string is not JSON", self.name))
            })?;

        match value.get(key) {
            Some(serde_json::Value::String(s)) => Ok(SecretString::new(s.clone())),
            Some(_) => Err(SecretStoreError::InvalidFormat(format!(
                "{}/{key}: value is not a string",
                self.name
            ))),
            None => Err(SecretStoreError::NotFound(format!("{}/{key}", self.name))),
        }
    }
}
