//! Error types for the storage crate.

use thiserror::Error;

/// Errors that can occur while configuring or using mounts
#[derive(Error, Debug)]
pub enum StorageError {
    /// A secret the mount needs isn't available
    #[error("Missing secret {key} in scope {scope}")]
    MissingSecret { scope: String, key: String },

    /// Environment configuration couldn't be deserialized
    #[error("Invalid storage configuration: {0}")]
    Config(#[from] envy::Error),

    /// No mount covers the given path
    #[error("No mount covers path: {path}")]
    NotMounted { path: String },

    /// The path is malformed or escapes its mount
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The local directory backing a mount doesn't exist
    #[error("Mount backing directory not found: {path}")]
    MissingBackingDir { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
