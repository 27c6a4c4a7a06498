//! Stead Config
//!
//! Environment-driven configuration. Each gateway loads its own section
//! lazily: a missing variable fails the gateway call that needed it, not
//! process startup. There is deliberately no startup validation pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stead_core::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

impl From<ConfigError> for GatewayError {
    fn from(err: ConfigError) -> Self {
        GatewayError::config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn required(name: &'static str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Document store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            uri: required("STEAD_MONGO_URI")?,
            database: required("STEAD_MONGO_DB")?,
        })
    }
}

/// Identity provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_key: String,
}

impl IdentityConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: optional("STEAD_IDENTITY_URL")
                .unwrap_or_else(|| "https://identitytoolkit.googleapis.com".to_string()),
            api_key: required("STEAD_IDENTITY_API_KEY")?,
        })
    }
}

/// Object storage plus the CDN base used to mint public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: Option<String>,
    pub bucket: String,
    pub cdn_base: String,
    /// Bearer token for S3-compatible endpoints that accept one.
    pub token: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: required("STEAD_STORAGE_ENDPOINT")?,
            region: optional("STEAD_STORAGE_REGION"),
            bucket: required("STEAD_STORAGE_BUCKET")?,
            cdn_base: required("STEAD_CDN_BASE")?,
            token: optional("STEAD_STORAGE_TOKEN"),
        })
    }
}

/// SMTP relay plus the admin notification address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub admin_email: String,
}

impl MailConfig {
    pub fn from_env() -> Result<Self> {
        let port = required("STEAD_SMTP_PORT")?;
        Ok(Self {
            host: required("STEAD_SMTP_HOST")?,
            port: port
                .parse()
                .map_err(|_| ConfigError::Invalid("STEAD_SMTP_PORT", port.clone()))?,
            username: required("STEAD_SMTP_USER")?,
            password: required("STEAD_SMTP_PASSWORD")?,
            from: required("STEAD_SMTP_FROM")?,
            admin_email: required("STEAD_ADMIN_EMAIL")?,
        })
    }
}

/// Bind address for the web application.
pub fn bind_addr() -> String {
    optional("STEAD_WEB_BIND").unwrap_or_else(|| "0.0.0.0:5000".to_string())
}

/// Drives the `Secure` flag on session cookies.
pub fn is_production() -> bool {
    optional("STEAD_ENV").as_deref() == Some("production")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_is_a_call_time_error() {
        std::env::remove_var("STEAD_STORAGE_ENDPOINT");
        let err = StorageConfig::from_env().unwrap_err();
        assert_eq!(err, ConfigError::Missing("STEAD_STORAGE_ENDPOINT"));
    }

    #[test]
    fn test_config_error_maps_to_tagged_gateway_error() {
        let err: GatewayError = ConfigError::Missing("STEAD_MONGO_URI").into();
        assert_eq!(err.code, "config-error");
        assert!(err.message.contains("STEAD_MONGO_URI"));
    }

    #[test]
    fn test_bind_addr_default() {
        std::env::remove_var("STEAD_WEB_BIND");
        assert_eq!(bind_addr(), "0.0.0.0:5000");
    }
}
