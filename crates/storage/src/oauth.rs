//! OAuth client-credential settings for the storage driver.

use crate::error::Result;
use crate::secrets::SecretStore;
use std::collections::BTreeMap;
use std::fmt;

pub const CLIENT_ID_KEY: &str = "clientid";
pub const CLIENT_SECRET_KEY: &str = "test1";
pub const TENANT_ID_KEY: &str = "tenantid";

/// Service principal credentials read from a secret scope
///
/// `Debug` never prints the client secret.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl OAuthCredentials {
    /// Read the three secrets from `scope`
    ///
    /// Fails on the first missing key.
    pub fn from_secrets(store: &dyn SecretStore, scope: &str) -> Result<Self> {
        Ok(Self {
            client_id: store.get(scope, CLIENT_ID_KEY)?,
            client_secret: store.get(scope, CLIENT_SECRET_KEY)?,
            tenant_id: store.get(scope, TENANT_ID_KEY)?,
        })
    }

    pub fn token_endpoint(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/token",
            self.tenant_id
        )
    }

    /// Driver configuration passed along with a mount
    pub fn extra_configs(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("fs.azure.account.auth.type".to_string(), "OAuth".to_string()),
            (
                "fs.azure.account.oauth.provider.type".to_string(),
                "org.apache.hadoop.fs.azurebfs.oauth2.ClientCredsTokenProvider".to_string(),
            ),
            (
                "fs.azure.account.oauth2.client.id".to_string(),
                self.client_id.clone(),
            ),
            (
                "fs.azure.account.oauth2.client.secret".to_string(),
                self.client_secret.clone(),
            ),
            (
                "fs.azure.account.oauth2.client.endpoint".to_string(),
                self.token_endpoint(),
            ),
        ])
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::secrets::StaticSecretStore;

    fn store() -> StaticSecretStore {
        StaticSecretStore::new()
            .with_secret("moviescope", "clientid", "client-123")
            .with_secret("moviescope", "test1", "s3cret")
            .with_secret("moviescope", "tenantid", "tenant-456")
    }

    #[test]
    fn test_from_secrets() {
        let creds = OAuthCredentials::from_secrets(&store(), "moviescope").unwrap();
        assert_eq!(creds.client_id, "client-123");
        assert_eq!(creds.tenant_id, "tenant-456");
    }

    #[test]
    fn test_missing_secret() {
        let partial = StaticSecretStore::new().with_secret("moviescope", "clientid", "x");
        let err = OAuthCredentials::from_secrets(&partial, "moviescope").unwrap_err();
        match err {
            StorageError::MissingSecret { key, .. } => assert_eq!(key, "test1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_configs() {
        let configs = OAuthCredentials::from_secrets(&store(), "moviescope")
            .unwrap()
            .extra_configs();

        assert_eq!(configs.len(), 5);
        assert_eq!(configs["fs.azure.account.auth.type"], "OAuth");
        // The ABFS driver reads `oauth`, not `oauth2`, for the provider key
        assert_eq!(
            configs["fs.azure.account.oauth.provider.type"],
            "org.apache.hadoop.fs.azurebfs.oauth2.ClientCredsTokenProvider"
        );
        assert!(!configs.contains_key("fs.azure.account.oauth2.provider.type"));
        assert_eq!(configs["fs.azure.account.oauth2.client.id"], "client-123");
        assert_eq!(configs["fs.azure.account.oauth2.client.secret"], "s3cret");
        assert_eq!(
            configs["fs.azure.account.oauth2.client.endpoint"],
            "https://login.microsoftonline.com/tenant-456/oauth2/token"
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = OAuthCredentials::from_secrets(&store(), "moviescope").unwrap();
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("s3cret"));
    }
}
