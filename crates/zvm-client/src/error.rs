//! Error types for zvm-client

use thiserror::Error;

/// Token exchange failed. Fatal for an audit cycle.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request never produced an HTTP response
    #[error("token request failed: {0}")]
    Transport(String),

    /// Token endpoint answered with a non-2xx status
    #[error("token endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON object
    #[error("token response could not be decoded: {0}")]
    Decode(String),

    /// Response decoded but carried no usable `access_token`
    #[error("token response has no access_token")]
    MissingAccessToken,
}

/// Reading a collection failed. Aborts only that collection's pass.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request never produced an HTTP response
    #[error("request for {collection} failed: {message}")]
    Transport { collection: String, message: String },

    /// Endpoint answered with a non-2xx status
    #[error("{collection} endpoint returned HTTP {status}")]
    Status { collection: String, status: u16 },

    /// Body was not a JSON array
    #[error("{collection} response could not be decoded: {message}")]
    Decode { collection: String, message: String },
}

impl FetchError {
    /// Collection the failed request targeted.
    pub fn collection(&self) -> &str {
        match self {
            FetchError::Transport { collection, .. }
            | FetchError::Status { collection, .. }
            | FetchError::Decode { collection, .. } => collection,
        }
    }
}

/// Client construction error
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Build(err.to_string())
    }
}
