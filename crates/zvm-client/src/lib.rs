//! ZVM-Client: REST access to a Zerto Virtual Manager
//!
//! Two operations are exposed, both on [`ZvmClient`]:
//!
//! - `acquire_token`: OAuth2 password grant against the ZVM's Keycloak realm
//! - `fetch_collection`: authenticated `GET /v1/{collection}` returning the
//!   raw JSON records
//!
//! Tokens are never cached; callers acquire a fresh one per run.

mod client;
pub mod config;
mod error;
mod token;

pub use client::ZvmClient;
pub use config::{
    parse_bool_flag, ZvmConfig, DEFAULT_ADDRESS, DEFAULT_CLIENT_ID, DEFAULT_USERNAME, TOKEN_PATH,
};
pub use error::{AuthError, ClientError, FetchError};
pub use token::AccessToken;
