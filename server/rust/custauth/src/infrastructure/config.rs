use std::time::Duration;

use custauth_retry::RetryConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::customer_client::CustomerServiceConfig;

/// ConfigError は設定値の検証エラー。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("secret.name must not be empty")]
    EmptySecretName,

    #[error("secret.allow_fallback requires secret.fallback_value (JWT_SECRET)")]
    FallbackWithoutValue,

    #[error("server.port must not be 0")]
    InvalidPort,

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },

    #[error("no signing secret source: configure secret_store or enable secret.allow_fallback")]
    NoSecretSource,

    #[error("secret.retry.multiplier must be at least 1.0")]
    InvalidRetryMultiplier,
}

/// Config はアプリケーション全体の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub secret: SecretConfig,
    #[serde(default)]
    pub secret_store: Option<SecretStoreSettings>,
    #[serde(default)]
    pub customer_service: Option<CustomerServiceConfig>,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// AppConfig はアプリケーション基本設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

/// ServerConfig はサーバー設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// SecretConfig は署名鍵の取得設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default = "default_secret_name")]
    pub name: String,
    /// ストア障害時にローカル値を使うか。既定では fail-closed。
    #[serde(default)]
    pub allow_fallback: bool,
    #[serde(default)]
    pub fallback_value: Option<SecretString>,
    #[serde(default)]
    pub retry: SecretRetryConfig,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            name: default_secret_name(),
            allow_fallback: false,
            fallback_value: None,
            retry: SecretRetryConfig::default(),
        }
    }
}

fn default_secret_name() -> String {
    "custauth/jwt".to_string()
}

impl SecretConfig {
    /// フォールバックが有効で、値が設定されている場合のみ返す。
    pub fn effective_fallback(&self) -> Option<SecretString> {
        if self.allow_fallback {
            self.fallback_value.clone()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretRetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for SecretRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_multiplier() -> f64 {
    2.0
}

impl SecretRetryConfig {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_multiplier(self.multiplier)
    }
}

/// SecretStoreSettings は外部シークレットストアの接続設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct SecretStoreSettings {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

/// ObservabilityConfig はログ出力の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// YAML 文字列から設定を読み込む。
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// 設定ファイルを読み込み、環境変数で上書きしてから検証する。
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 環境変数による上書きを適用する。lookup はテストで差し替えられるよう引数で受け取る。
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("JWT_SECRET_NAME") {
            self.secret.name = name;
        }
        if let Some(value) = lookup("JWT_SECRET") {
            self.secret.fallback_value = Some(SecretString::new(value));
        }
        if let Some(raw) = lookup("JWT_SECRET_ALLOW_FALLBACK") {
            self.secret.allow_fallback = parse_bool("JWT_SECRET_ALLOW_FALLBACK", &raw)?;
        }
        if let Some(url) = lookup("SECRET_STORE_URL") {
            let timeout_secs = self
                .secret_store
                .as_ref()
                .map_or_else(default_timeout_secs, |s| s.timeout_secs);
            self.secret_store = Some(SecretStoreSettings { url, timeout_secs });
        }
        if let Some(url) = lookup("CUSTOMER_SERVICE_URL") {
            let timeout_secs = self
                .customer_service
                .as_ref()
                .map_or_else(default_timeout_secs, |c| c.timeout_secs);
            self.customer_service = Some(CustomerServiceConfig { url, timeout_secs });
        }
        if let Some(raw) = lookup("PORT") {
            self.server.port = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT".to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.name.trim().is_empty() {
            return Err(ConfigError::EmptySecretName);
        }
        if self.secret.allow_fallback {
            let has_value = self
                .secret
                .fallback_value
                .as_ref()
                .is_some_and(|v| !v.expose_secret().is_empty());
            if !has_value {
                return Err(ConfigError::FallbackWithoutValue);
            }
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        let multiplier = self.secret.retry.multiplier;
        if multiplier.is_nan() || multiplier < 1.0 {
            return Err(ConfigError::InvalidRetryMultiplier);
        }
        // ストアもフォールバックも無い場合、署名鍵を得る手段がない
        if self.secret_store.is_none() && self.secret.effective_fallback().is_none() {
            return Err(ConfigError::NoSecretSource);
        }
        Ok(())
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
