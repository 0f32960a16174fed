//! Auditor configuration: where the ZVM is and where the seen store lives.
//!
//! Built once at startup and handed to the collaborators; nothing reads the
//! environment after that.

use zvm_client::{ZvmClient, ZvmConfig};
use zvm_state::{StoreConfig, SurrealSeenStore};

use crate::error::AuditorError;

#[derive(Debug, Clone)]
pub struct AuditorConfig {
    pub zvm: ZvmConfig,
    pub store: StoreConfig,
}

impl AuditorConfig {
    pub fn new(zvm: ZvmConfig, store: StoreConfig) -> Self {
        Self { zvm, store }
    }

    /// Build the ZVM client.
    pub fn client(&self) -> Result<ZvmClient, AuditorError> {
        Ok(ZvmClient::new(self.zvm.clone())?)
    }

    /// Open the file-backed seen store.
    pub async fn open_store(&self) -> Result<SurrealSeenStore, AuditorError> {
        Ok(SurrealSeenStore::open(&self.store).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zvm_state::{Collection, SeenStore};

    #[test]
    fn test_client_from_config() {
        let config = AuditorConfig::new(
            ZvmConfig::new("zvm.lab", "admin", "secret"),
            StoreConfig::default(),
        );
        let client = config.client().unwrap();
        assert_eq!(client.config().address, "zvm.lab");
        assert!(!client.config().verify_certificate);
    }

    #[tokio::test]
    async fn test_open_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db");
        let config = AuditorConfig::new(
            ZvmConfig::new("zvm.lab", "admin", "secret"),
            StoreConfig::new(&path),
        );

        let store = config.open_store().await.unwrap();
        assert!(path.exists());
        assert_eq!(store.count(Collection::Events).await.unwrap(), 0);
    }
}
