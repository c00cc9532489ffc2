//! # Configuration Management
//!
//! Centralized configuration for the framing and storage cores.
//!
//! This module provides the protocol-wide size constants and the structured
//! configuration for storage buckets: chunk sizing and the logical
//! destinations chunk and file records are written to.
//!
//! ## Configuration Sources
//! - TOML files via `from_toml_file()`
//! - TOML strings via `from_toml_str()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults
//!
//! ## Defaults
//! - Chunk size 255 KiB: small enough to keep per-chunk records well under the
//!   document size ceiling, large enough to amortize per-insert overhead
//! - Bucket name `fs`, giving the destinations `fs.chunks` and `fs.files`

use crate::error::constants::{ERR_BUCKET_NAME_DOTTED, ERR_BUCKET_NAME_EMPTY, ERR_CHUNK_SIZE_ZERO};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default chunk size for uploads: 255 KiB.
pub const DEFAULT_CHUNK_SIZE_BYTES: usize = 255 * 1024;

/// Largest permitted chunk size. A chunk must fit inside a single stored
/// document, so this tracks the document size ceiling.
pub const MAX_CHUNK_SIZE_BYTES: usize = 16 * 1024 * 1024;

/// Largest permitted framed message, header included.
pub const MAX_MESSAGE_SIZE: usize = 48 * 1024 * 1024;

/// Default bucket name.
pub const DEFAULT_BUCKET_NAME: &str = "fs";

/// Bucket-level configuration shared by every upload opened against a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Bucket name, used to derive the chunk and file record destinations.
    pub bucket_name: String,

    /// Default chunk size in bytes for uploads in this bucket.
    /// Per-upload options may override it.
    pub chunk_size_bytes: usize,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            bucket_name: String::from(DEFAULT_BUCKET_NAME),
            chunk_size_bytes: DEFAULT_CHUNK_SIZE_BYTES,
        }
    }
}

impl BucketConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml_str(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(content)
            .map_err(|e| ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("DOCFRAME_BUCKET_NAME") {
            config.bucket_name = name;
        }

        if let Ok(size) = std::env::var("DOCFRAME_CHUNK_SIZE_BYTES") {
            if let Ok(val) = size.parse::<usize>() {
                config.chunk_size_bytes = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Destination name for chunk records in this bucket.
    pub fn chunks_destination(&self) -> String {
        format!("{}.chunks", self.bucket_name)
    }

    /// Destination name for file records in this bucket.
    pub fn files_destination(&self) -> String {
        format!("{}.files", self.bucket_name)
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.bucket_name.is_empty() {
            errors.push(ERR_BUCKET_NAME_EMPTY.to_string());
        } else if self.bucket_name.contains('.') {
            errors.push(ERR_BUCKET_NAME_DOTTED.to_string());
        }

        if let Err(e) = validate_chunk_size(self.chunk_size_bytes) {
            errors.push(e.0);
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<(), ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Check a chunk size against the permitted range. Shared by bucket validation
/// and per-stream overrides.
pub(crate) fn validate_chunk_size(chunk_size_bytes: usize) -> Result<(), ConfigError> {
    if chunk_size_bytes == 0 {
        return Err(ConfigError(ERR_CHUNK_SIZE_ZERO.to_string()));
    }
    if chunk_size_bytes > MAX_CHUNK_SIZE_BYTES {
        return Err(ConfigError(format!(
            "Chunk size too large: {chunk_size_bytes} bytes (maximum: {MAX_CHUNK_SIZE_BYTES} bytes)"
        )));
    }
    Ok(())
}
