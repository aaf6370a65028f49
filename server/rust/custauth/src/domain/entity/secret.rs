use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// SigningSecret は HS256 の対称鍵。空文字列は受け付けない。
pub struct SigningSecret(SecretString);

impl SigningSecret {
    pub fn new(value: SecretString) -> Option<Self> {
        if value.expose_secret().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn from_plain(value: impl Into<String>) -> Option<Self> {
        Self::new(SecretString::new(value.into()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}
