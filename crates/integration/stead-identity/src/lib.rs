//! Stead Identity
//!
//! Thin client over the identity platform's REST account endpoints.
//! Provider error payloads are decoded and remapped; no reqwest error type
//! escapes this crate. The [`IdentityProvider`] trait is the seam the auth
//! gateway mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stead_config::IdentityConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("{0}")]
    Provider(String),

    #[error("identity request failed: {0}")]
    Transport(String),

    #[error("identity configuration missing: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// A provider-side session minted by sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSession {
    pub local_id: String,
    pub id_token: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<ProviderSession>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession>;
    async fn update_profile(&self, id_token: &str, display_name: &str) -> Result<()>;
    async fn send_password_reset(&self, email: &str) -> Result<()>;
    async fn confirm_password_reset(&self, oob_code: &str, new_password: &str) -> Result<()>;
    /// Best-effort: provider bearer tokens are stateless, so this only
    /// logs; session teardown is the cookie removal in the auth gateway.
    async fn sign_out(&self, id_token: &str) -> Result<()>;
}

/// REST implementation.
pub struct RestIdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestIdentityClient {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    /// Loads configuration at call time; a missing key fails here, not at
    /// process startup.
    pub fn from_env() -> Result<Self> {
        let config = IdentityConfig::from_env().map_err(|e| IdentityError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, action, self.api_key
        )
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = response.status();
        let payload = response
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        decode_response(status.is_success(), &payload)
    }
}

/// Split the provider's success and error payloads. Errors arrive as
/// `{"error": {"message": "..."}}`; anything undecodable falls back to a
/// generic message.
pub fn decode_response<R: for<'de> Deserialize<'de>>(success: bool, payload: &[u8]) -> Result<R> {
    if success {
        return serde_json::from_slice(payload).map_err(|e| IdentityError::Transport(e.to_string()));
    }

    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let message = serde_json::from_slice::<ErrorEnvelope>(payload)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| "Authentication failed".to_string());
    Err(IdentityError::Provider(message))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[async_trait]
impl IdentityProvider for RestIdentityClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<ProviderSession> {
        self.post(
            "signInWithPassword",
            &PasswordCredentials {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession> {
        self.post(
            "signUp",
            &PasswordCredentials {
                email,
                password,
                return_secure_token: true,
            },
        )
        .await
    }

    async fn update_profile(&self, id_token: &str, display_name: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                "update",
                &serde_json::json!({
                    "idToken": id_token,
                    "displayName": display_name,
                    "returnSecureToken": false,
                }),
            )
            .await?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                "sendOobCode",
                &serde_json::json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email,
                }),
            )
            .await?;
        Ok(())
    }

    async fn confirm_password_reset(&self, oob_code: &str, new_password: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                "resetPassword",
                &serde_json::json!({
                    "oobCode": oob_code,
                    "newPassword": new_password,
                }),
            )
            .await?;
        Ok(())
    }

    async fn sign_out(&self, _id_token: &str) -> Result<()> {
        tracing::debug!("provider tokens are stateless; sign-out is cookie teardown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_payload_decodes_session() {
        let payload = br#"{"localId":"u1","idToken":"tok","displayName":"Ada"}"#;
        let session: ProviderSession = decode_response(true, payload).unwrap();
        assert_eq!(session.local_id, "u1");
        assert_eq!(session.id_token, "tok");
        assert_eq!(session.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_provider_error_message_is_extracted() {
        let payload = br#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#;
        let err = decode_response::<ProviderSession>(false, payload).unwrap_err();
        assert_eq!(err, IdentityError::Provider("EMAIL_EXISTS".into()));
    }

    #[test]
    fn test_undecodable_error_falls_back_to_generic_message() {
        let err = decode_response::<ProviderSession>(false, b"<html>502</html>").unwrap_err();
        assert_eq!(err, IdentityError::Provider("Authentication failed".into()));
    }

    #[test]
    fn test_endpoint_shape() {
        let client = RestIdentityClient::new(IdentityConfig {
            base_url: "https://id.example.com/".into(),
            api_key: "k1".into(),
        });
        assert_eq!(
            client.endpoint("signUp"),
            "https://id.example.com/v1/accounts:signUp?key=k1"
        );
    }
}
