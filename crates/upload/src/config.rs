//! Configuration for upload processing.
//!
//! The ceiling is read, never mutated, by every concurrent request, so a
//! single `UploadConfig` is built at start-up and shared by reference.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default body ceiling: 32 MiB.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 32 << 20;

/// Policy values applied to every upload request.
///
/// # Example
///
/// ```rust
/// use upload::UploadConfig;
///
/// let config = UploadConfig::default();
/// assert_eq!(config.max_body_bytes, 32 * 1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest body, in bytes, that will be buffered before the request is
    /// rejected with [`BodyTooLarge`](crate::ProcessingError::BodyTooLarge).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl UploadConfig {
    /// Creates a config with the given ceiling.
    pub fn with_max_body_bytes(max_body_bytes: u64) -> Self {
        Self { max_body_bytes }
    }

    /// Checks the configuration for values that would reject every request.
    ///
    /// Call it once at start-up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroCeiling);
        }
        Ok(())
    }
}

fn default_max_body_bytes() -> u64 {
    DEFAULT_MAX_BODY_BYTES
}

/// Errors returned by [`UploadConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// `max_body_bytes` is zero, so no request could ever be accepted.
    #[error("max_body_bytes must be greater than zero")]
    ZeroCeiling,
}
