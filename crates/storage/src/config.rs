//! Mount settings loaded from the environment.
//!
//! Every field can be overridden with a `MOVIELENS_`-prefixed variable,
//! e.g. `MOVIELENS_ACCOUNT_NAME` or `MOVIELENS_LOCAL_ROOT`. A `.env` file in
//! the working directory is read first if present.

use crate::error::Result;
use crate::mount::MountSpec;
use serde::Deserialize;
use std::path::PathBuf;

/// Prefix for all storage environment variables
pub const ENV_PREFIX: &str = "MOVIELENS_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MountSettings {
    #[serde(default = "default_account_name")]
    pub account_name: String,

    #[serde(default = "default_container_name")]
    pub container_name: String,

    #[serde(default = "default_folder_name")]
    pub folder_name: String,

    #[serde(default = "default_mount_point")]
    pub mount_point: String,

    /// Local directory standing in for the container
    #[serde(default = "default_local_root")]
    pub local_root: PathBuf,

    #[serde(default = "default_secret_scope")]
    pub secret_scope: String,
}

fn default_account_name() -> String {
    "moviedata983940".to_string()
}

fn default_container_name() -> String {
    "validated".to_string()
}

fn default_folder_name() -> String {
    "Data".to_string()
}

fn default_mount_point() -> String {
    "/mnt/Files/Validated".to_string()
}

fn default_local_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_secret_scope() -> String {
    "moviescope".to_string()
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            account_name: default_account_name(),
            container_name: default_container_name(),
            folder_name: default_folder_name(),
            mount_point: default_mount_point(),
            local_root: default_local_root(),
            secret_scope: default_secret_scope(),
        }
    }
}

impl MountSettings {
    /// Load from the process environment (and `.env`, if any)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load from explicit key/value pairs, using the same prefix
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(pairs)?)
    }

    pub fn mount_spec(&self) -> MountSpec {
        MountSpec {
            account_name: self.account_name.clone(),
            container_name: self.container_name.clone(),
            folder_name: self.folder_name.clone(),
            mount_point: self.mount_point.clone(),
            local_root: self.local_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = MountSettings::from_pairs(Vec::new()).unwrap();
        assert_eq!(settings, MountSettings::default());
        assert_eq!(settings.mount_point, "/mnt/Files/Validated");
    }

    #[test]
    fn test_prefixed_overrides() {
        let settings = MountSettings::from_pairs(vec![
            pair("MOVIELENS_ACCOUNT_NAME", "otheraccount"),
            pair("MOVIELENS_LOCAL_ROOT", "/tmp/movies"),
            // Unprefixed variables are ignored
            pair("CONTAINER_NAME", "ignored"),
        ])
        .unwrap();

        assert_eq!(settings.account_name, "otheraccount");
        assert_eq!(settings.local_root, PathBuf::from("/tmp/movies"));
        assert_eq!(settings.container_name, "validated");
    }

    #[test]
    fn test_mount_spec_source() {
        let spec = MountSettings::default().mount_spec();
        assert_eq!(
            spec.source(),
            "abfss://validated@moviedata983940.dfs.core.windows.net/Data"
        );
    }
}
