//! ZVM connection configuration

/// ZVM address used when `ZVM_ADDRESS` is unset.
pub const DEFAULT_ADDRESS: &str = "172.16.50.100";

/// Username used when `ZVM_USERNAME` is unset.
pub const DEFAULT_USERNAME: &str = "admin";

/// Keycloak client registered for the ZVM password grant.
pub const DEFAULT_CLIENT_ID: &str = "zerto-client";

/// Token endpoint of the `zerto` realm, relative to the ZVM base URL.
pub const TOKEN_PATH: &str = "/auth/realms/zerto/protocol/openid-connect/token";

/// ZVM connection configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ZvmConfig {
    /// ZVM host or IP address (no scheme)
    pub address: String,
    /// Keycloak username
    pub username: String,
    /// Keycloak password
    pub password: String,
    /// Whether to verify the ZVM's TLS certificate (default: false)
    pub verify_certificate: bool,
    /// OAuth2 client id (default: "zerto-client")
    pub client_id: String,
    /// Overrides the `https://{address}` base URL
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ZvmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZvmConfig")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"***")
            .field("verify_certificate", &self.verify_certificate)
            .field("client_id", &self.client_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ZvmConfig {
    /// Create a configuration for `address` with the given credentials
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
            verify_certificate: false,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            base_url: None,
        }
    }

    /// Enable or disable TLS certificate verification
    pub fn with_verify_certificate(mut self, verify: bool) -> Self {
        self.verify_certificate = verify;
        self
    }

    /// Set a custom OAuth2 client id
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Point the client at an explicit base URL (scheme included)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base URL every endpoint is resolved against, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.address),
        }
    }

    /// Keycloak token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url(), TOKEN_PATH)
    }

    /// Listing endpoint for a collection (`events`, `tasks`, ...).
    pub fn collection_url(&self, name: &str) -> String {
        format!("{}/v1/{}", self.base_url(), name)
    }
}

/// Interpret a boolean environment flag: `true`, `1` and `t` (any case) are on,
/// everything else is off.
pub fn parse_bool_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "t")
}
