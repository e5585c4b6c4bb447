//! Storage mounts for the MovieLens input files.
//!
//! This crate provides:
//! - MountSettings: account, container, folder and mount point from the environment
//! - SecretStore trait with environment and in-memory implementations
//! - OAuthCredentials and the driver configuration derived from them
//! - MountTable: idempotent mounts and path resolution
//!
//! ## Example Usage
//! ```ignore
//! use storage::*;
//!
//! let settings = MountSettings::from_env()?;
//! let credentials = OAuthCredentials::from_secrets(&EnvSecretStore, &settings.secret_scope)?;
//!
//! let table = MountTable::new();
//! table.mount(&settings.mount_spec(), &credentials)?;
//! let movies = table.resolve("dbfs:/mnt/Files/Validated/movies.csv")?;
//! ```

pub mod config;
pub mod error;
pub mod mount;
pub mod oauth;
pub mod secrets;

pub use config::MountSettings;
pub use error::{Result, StorageError};
pub use mount::{MountInfo, MountOutcome, MountSpec, MountTable};
pub use oauth::OAuthCredentials;
pub use secrets::{EnvSecretStore, SecretStore, StaticSecretStore};
