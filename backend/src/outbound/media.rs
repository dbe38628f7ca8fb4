//! Filesystem [`MediaStore`] rooted at a capability-scoped directory.
//!
//! All paths are resolved through a `cap_std` [`Dir`], so a stored path can
//! never reach outside the media root even when it contains symlinks.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};

use crate::domain::ports::{MediaStore, MediaStoreError};

/// Media store writing files below a root directory.
#[derive(Clone)]
pub struct DirMediaStore {
    root: Arc<Dir>,
}

impl DirMediaStore {
    /// Open (creating if needed) the media root.
    ///
    /// # Examples
    /// ```
    /// use backend::outbound::media::DirMediaStore;
    ///
    /// # fn main() -> std::io::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let _store = DirMediaStore::open(dir.path())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }

    async fn run<T, F>(&self, path: &str, op: F) -> Result<T, MediaStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir, &Path) -> io::Result<T> + Send + 'static,
    {
        let relative = relative_path(path)?;
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || op(&root, &relative))
            .await
            .map_err(|err| MediaStoreError::io(format!("media task failed: {err}")))?
            .map_err(|err| {
                warn!(path, error = %err, "media store operation failed");
                MediaStoreError::io(err.to_string())
            })
    }
}

/// Accept only plain relative paths made of normal components.
fn relative_path(path: &str) -> Result<PathBuf, MediaStoreError> {
    let candidate = Path::new(path);
    let plain = !path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if plain {
        Ok(candidate.to_path_buf())
    } else {
        debug!(path, "rejected media path");
        Err(MediaStoreError::invalid_path(path))
    }
}

fn missing_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl MediaStore for DirMediaStore {
    async fn save(&self, path: &str, bytes: &[u8]) -> Result<(), MediaStoreError> {
        let bytes = bytes.to_vec();
        self.run(path, move |root, relative| {
            if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
                root.create_dir_all(parent)?;
            }
            root.write(relative, bytes)
        })
        .await
    }

    async fn load(&self, path: &str) -> Result<Option<Vec<u8>>, MediaStoreError> {
        self.run(path, |root, relative| missing_as_none(root.read(relative)))
            .await
    }

    async fn delete(&self, path: &str) -> Result<bool, MediaStoreError> {
        self.run(path, |root, relative| {
            missing_as_none(root.remove_file(relative)).map(|removed| removed.is_some())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const PATH: &str = "uploads/recipe/images/abc.png";

    #[fixture]
    fn media_root() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    #[tokio::test]
    async fn saved_files_can_be_loaded_and_deleted(media_root: TempDir) {
        let store = DirMediaStore::open(media_root.path()).expect("open store");

        store.save(PATH, b"png").await.expect("save");
        assert!(media_root.path().join(PATH).is_file());
        assert_eq!(
            store.load(PATH).await.expect("load"),
            Some(b"png".to_vec())
        );

        assert!(store.delete(PATH).await.expect("delete"));
        assert!(!media_root.path().join(PATH).exists());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_files_are_not_errors(media_root: TempDir) {
        let store = DirMediaStore::open(media_root.path()).expect("open store");

        assert_eq!(store.load(PATH).await.expect("load"), None);
        assert!(!store.delete(PATH).await.expect("delete"));
    }

    #[rstest]
    #[case("../escape.png")]
    #[case("/etc/passwd")]
    #[case("./x.png")]
    #[case("")]
    #[tokio::test]
    async fn paths_outside_the_root_are_rejected(media_root: TempDir, #[case] path: &str) {
        let store = DirMediaStore::open(media_root.path()).expect("open store");

        let err = store.save(path, b"x").await.expect_err("rejected");

        assert!(matches!(err, MediaStoreError::InvalidPath { .. }));
    }

    #[rstest]
    fn open_creates_the_root(media_root: TempDir) {
        let nested = media_root.path().join("media");
        DirMediaStore::open(&nested).expect("open store");
        assert!(nested.is_dir());
    }
}
