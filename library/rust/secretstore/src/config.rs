use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SecretStoreConfig {
    pub server_url: String,
    pub timeout: Duration,
}

impl SecretStoreConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
