//! Document storage with remote upload and local fallback.
//!
//! The uploader is a boolean-returning boundary: a call either fully
//! succeeds or fully fails, and no error ever propagates past it. The
//! underlying failure reason is kept in the log as a side channel.

pub mod disk;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use disk::DiskClient;

/// Errors that can occur inside one upload attempt.
///
/// Internal only: narrowed to a `bool` at [`StorageUploader::upload`].
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request to the remote disk failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote disk rejected the request.
    #[error("remote api error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Local filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote storage backend: a folder namespace with idempotent uploads.
pub trait RemoteStore: Send + Sync {
    /// Whether `path` exists on the remote.
    fn exists(&self, path: &str) -> impl Future<Output = Result<bool, UploadError>> + Send;

    /// Create the folder `path`. Succeeds if it already exists.
    fn mkdir(&self, path: &str) -> impl Future<Output = Result<(), UploadError>> + Send;

    /// Upload the file at `local` to `remote`, overwriting any existing
    /// object with the same name.
    fn upload(
        &self,
        local: &Path,
        remote: &str,
    ) -> impl Future<Output = Result<(), UploadError>> + Send;
}

/// Uploads rendered documents to the remote disk, or to a local reports
/// directory when no remote is configured.
pub struct StorageUploader<T: RemoteStore> {
    remote: Option<T>,
    remote_folder: String,
    local_dir: PathBuf,
}

impl<T: RemoteStore> StorageUploader<T> {
    /// Create an uploader. `remote: None` makes every upload take the
    /// local fallback path.
    pub fn new(remote: Option<T>, remote_folder: impl Into<String>, local_dir: PathBuf) -> Self {
        Self {
            remote,
            remote_folder: remote_folder.into(),
            local_dir,
        }
    }

    /// Access the remote double from tests.
    #[cfg(test)]
    pub(crate) fn remote_ref(&self) -> Option<&T> {
        self.remote.as_ref()
    }

    /// Persist the artifact at `local_path` under `logical_name`.
    ///
    /// Returns `true` on full success. Every failure is logged with its
    /// reason and converted to `false`; this method never panics and
    /// never returns an error.
    pub async fn upload(&self, local_path: &Path, logical_name: &str) -> bool {
        match self.try_upload(local_path, logical_name).await {
            Ok(()) => {
                tracing::info!(name = logical_name, "document stored");
                true
            }
            Err(error) => {
                tracing::error!(name = logical_name, error = %error, "document upload failed");
                false
            }
        }
    }

    async fn try_upload(&self, local_path: &Path, logical_name: &str) -> Result<(), UploadError> {
        let Some(remote) = &self.remote else {
            return self.store_locally(local_path, logical_name).await;
        };

        if !remote.exists(&self.remote_folder).await? {
            remote.mkdir(&self.remote_folder).await?;
        }
        let remote_path = format!("{}/{}", self.remote_folder, logical_name);
        remote.upload(local_path, &remote_path).await
    }

    /// Fallback: copy into the local reports directory, creating it if
    /// absent. Overwrites on name collision.
    async fn store_locally(&self, local_path: &Path, logical_name: &str) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.local_dir).await?;
        let destination = self.local_dir.join(logical_name);
        tokio::fs::copy(local_path, &destination).await?;
        tracing::debug!(path = %destination.display(), "no remote configured, stored locally");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Remote double recording calls; optionally failing uploads.
    #[derive(Default)]
    pub(crate) struct FakeRemote {
        pub folders: Mutex<Vec<String>>,
        pub uploads: Mutex<Vec<(PathBuf, String)>>,
        pub fail_uploads: bool,
    }

    impl RemoteStore for FakeRemote {
        async fn exists(&self, path: &str) -> Result<bool, UploadError> {
            Ok(self.folders.lock().expect("lock").iter().any(|f| f == path))
        }

        async fn mkdir(&self, path: &str) -> Result<(), UploadError> {
            self.folders.lock().expect("lock").push(path.to_owned());
            Ok(())
        }

        async fn upload(&self, local: &Path, remote: &str) -> Result<(), UploadError> {
            if self.fail_uploads {
                return Err(UploadError::Api {
                    status: 507,
                    message: "insufficient storage".to_owned(),
                });
            }
            self.uploads
                .lock()
                .expect("lock")
                .push((local.to_path_buf(), remote.to_owned()));
            Ok(())
        }
    }

    fn artifact(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write artifact");
        path
    }

    #[tokio::test]
    async fn test_local_fallback_writes_file() {
        let work = tempfile::tempdir().expect("tempdir");
        let reports = work.path().join("reports");
        let uploader: StorageUploader<FakeRemote> =
            StorageUploader::new(None, "unused", reports.clone());

        let source = artifact(&work, "doc.html", b"<html>act</html>");
        assert!(uploader.upload(&source, "Act_test.html").await);

        let stored = std::fs::read(reports.join("Act_test.html")).expect("read stored");
        assert_eq!(stored, b"<html>act</html>");
    }

    #[tokio::test]
    async fn test_local_fallback_overwrites_by_name() {
        let work = tempfile::tempdir().expect("tempdir");
        let reports = work.path().join("reports");
        let uploader: StorageUploader<FakeRemote> =
            StorageUploader::new(None, "unused", reports.clone());

        let first = artifact(&work, "a.html", b"first content");
        let second = artifact(&work, "b.html", b"second content");
        assert!(uploader.upload(&first, "Act_test.html").await);
        assert!(uploader.upload(&second, "Act_test.html").await);

        let entries = std::fs::read_dir(&reports).expect("read dir").count();
        assert_eq!(entries, 1);
        let stored = std::fs::read(reports.join("Act_test.html")).expect("read stored");
        assert_eq!(stored, b"second content");
    }

    #[tokio::test]
    async fn test_remote_upload_creates_folder_once() {
        let work = tempfile::tempdir().expect("tempdir");
        let uploader = StorageUploader::new(
            Some(FakeRemote::default()),
            "reports-folder",
            work.path().join("reports"),
        );

        let source = artifact(&work, "doc.html", b"doc");
        assert!(uploader.upload(&source, "Act_one.html").await);
        assert!(uploader.upload(&source, "Act_two.html").await);

        let remote = uploader.remote.as_ref().expect("remote");
        assert_eq!(remote.folders.lock().expect("lock").len(), 1);
        let uploads = remote.uploads.lock().expect("lock");
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].1, "reports-folder/Act_one.html");
        assert_eq!(uploads[1].1, "reports-folder/Act_two.html");
    }

    #[tokio::test]
    async fn test_remote_failure_is_narrowed_to_false() {
        let work = tempfile::tempdir().expect("tempdir");
        let remote = FakeRemote {
            fail_uploads: true,
            ..FakeRemote::default()
        };
        let uploader =
            StorageUploader::new(Some(remote), "reports-folder", work.path().join("reports"));

        let source = artifact(&work, "doc.html", b"doc");
        assert!(!uploader.upload(&source, "Act_test.html").await);
    }
}
