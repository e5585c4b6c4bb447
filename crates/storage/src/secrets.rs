//! Secret lookup by (scope, key).

use crate::error::{Result, StorageError};
use std::collections::HashMap;

/// Source of named secrets, grouped by scope
pub trait SecretStore: Send + Sync {
    /// Fetch one secret, failing with `MissingSecret` if it isn't set
    fn get(&self, scope: &str, key: &str) -> Result<String>;
}

/// Reads secrets from environment variables named `<SCOPE>_<KEY>`
///
/// Both parts are upper-cased and `-` becomes `_`, so scope `moviescope`
/// and key `clientid` read `MOVIESCOPE_CLIENTID`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn var_name(scope: &str, key: &str) -> String {
        format!("{}_{}", scope, key).to_uppercase().replace('-', "_")
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, scope: &str, key: &str) -> Result<String> {
        std::env::var(Self::var_name(scope, key))
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StorageError::MissingSecret {
                scope: scope.to_string(),
                key: key.to_string(),
            })
    }
}

/// In-memory secrets, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<(String, String), String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret (builder pattern)
    pub fn with_secret(
        mut self,
        scope: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.secrets.insert((scope.into(), key.into()), value.into());
        self
    }
}

impl SecretStore for StaticSecretStore {
    fn get(&self, scope: &str, key: &str) -> Result<String> {
        self.secrets
            .get(&(scope.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::MissingSecret {
                scope: scope.to_string(),
                key: key.to_string(),
            })
    }
}
