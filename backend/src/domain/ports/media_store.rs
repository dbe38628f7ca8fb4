//! Port for storing uploaded media files.
//!
//! Paths are relative (`uploads/recipe/images/<uuid>.png`) and resolved by
//! the adapter against its own root.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The path escapes the store root or is otherwise unusable.
        InvalidPath { path: String } => "invalid media path: {path}",
        /// Filesystem operation failed.
        Io { message: String } => "media store i/o failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write `bytes` to `path`, creating parent directories as needed.
    async fn save(&self, path: &str, bytes: &[u8]) -> Result<(), MediaStoreError>;

    /// Read the file at `path`, or `None` when it does not exist.
    async fn load(&self, path: &str) -> Result<Option<Vec<u8>>, MediaStoreError>;

    /// Remove the file at `path`. Missing files are not an error and yield
    /// `Ok(false)`.
    async fn delete(&self, path: &str) -> Result<bool, MediaStoreError>;
}

/// Media store that accepts writes and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMediaStore;

#[async_trait]
impl MediaStore for FixtureMediaStore {
    async fn save(&self, _path: &str, _bytes: &[u8]) -> Result<(), MediaStoreError> {
        Ok(())
    }

    async fn load(&self, _path: &str) -> Result<Option<Vec<u8>>, MediaStoreError> {
        Ok(None)
    }

    async fn delete(&self, _path: &str) -> Result<bool, MediaStoreError> {
        Ok(false)
    }
}
