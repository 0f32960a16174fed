//! ZVM REST client
//!
//! One shared `reqwest::Client` per process. Certificate verification follows
//! `ZvmConfig::verify_certificate`; lab ZVMs usually serve self-signed
//! certificates, so it is off unless explicitly enabled.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ZvmConfig;
use crate::error::{AuthError, ClientError, FetchError};
use crate::token::AccessToken;

/// Token endpoint response. Only `access_token` is required by the auditor.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client for the ZVM token and listing endpoints
pub struct ZvmClient {
    config: ZvmConfig,
    http_client: reqwest::Client,
}

impl ZvmClient {
    /// Create a new ZVM client
    pub fn new(config: ZvmConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("zvm-auditor/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_certificate)
            .build()?;

        if !config.verify_certificate {
            debug!("TLS certificate verification disabled for {}", config.address);
        }

        Ok(ZvmClient {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ZvmConfig {
        &self.config
    }

    /// Exchange the configured credentials for a bearer token
    ///
    /// Single form-encoded password-grant request, no retry.
    #[instrument(skip(self), fields(username = %self.config.username))]
    pub async fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        let form = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
        ];

        let response = self
            .http_client
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        debug!(
            token_type = token.token_type.as_deref().unwrap_or("unknown"),
            expires_in = token.expires_in,
            "Got token data"
        );

        match token.access_token {
            Some(raw) if !raw.is_empty() => Ok(AccessToken::new(raw)),
            _ => Err(AuthError::MissingAccessToken),
        }
    }

    /// Read one collection (`events`, `tasks`, ...) as raw JSON records
    ///
    /// The response is expected to be the complete list; there is no
    /// pagination.
    #[instrument(skip(self, token))]
    pub async fn fetch_collection(
        &self,
        name: &str,
        token: &AccessToken,
    ) -> Result<Vec<Value>, FetchError> {
        let response = self
            .http_client
            .get(self.config.collection_url(name))
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                collection: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|e| FetchError::Decode {
            collection: name.to_string(),
            message: e.to_string(),
        })?;

        match body {
            Value::Array(records) => {
                debug!("Request successful: {} {} records", records.len(), name);
                Ok(records)
            }
            other => Err(FetchError::Decode {
                collection: name.to_string(),
                message: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
