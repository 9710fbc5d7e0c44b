/// Filesystem-backed document store
///
/// Layout on disk:
///
/// ```text
/// <root>/
/// ├── <namespace digest of user A>/
/// │   ├── notes.txt
/// │   └── scan.pdf
/// └── <namespace digest of user B>/
/// ```
///
/// Namespace directories are created on first use. Writes are not
/// synchronized: two concurrent uploads of the same name by the same user
/// race, and the last writer wins.
///
/// # Example
///
/// ```no_run
/// use cabinet_shared::storage::{namespace::derive, FileStore};
///
/// # async fn example() -> Result<(), cabinet_shared::storage::StorageError> {
/// let store = FileStore::new("uploads");
/// store.init().await?;
///
/// let ns = derive("alice", "$argon2id$...");
/// let stored = store.save(&ns, "My Notes.txt", b"hello").await?;
/// assert_eq!(stored, "My_Notes.txt");
/// assert_eq!(store.list(&ns).await?, vec!["My_Notes.txt".to_string()]);
/// # Ok(())
/// # }
/// ```

use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

use super::filename::{is_allowed, sanitize};
use super::namespace::NamespaceId;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filename is empty after sanitizing
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    /// Extension is not on the upload allow-list
    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),

    /// File is absent, or the requested name is not a canonical stored name
    #[error("File not found: {0}")]
    NotFound(String),

    /// Underlying filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An opened file ready to be sent as an attachment
#[derive(Debug)]
pub struct Download {
    /// Stored filename
    pub filename: String,

    /// Open handle positioned at the start of the file
    pub file: tokio::fs::File,

    /// File size in bytes
    pub len: u64,
}

/// Per-user file storage rooted at a single uploads directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`; nothing is touched on disk yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the uploads root if it is missing
    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!(root = %self.root.display(), "File store ready");
        Ok(())
    }

    /// Directory holding the files of one namespace
    pub fn namespace_dir(&self, id: &NamespaceId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Creates the namespace directory if absent; idempotent
    pub async fn ensure_namespace(&self, id: &NamespaceId) -> Result<PathBuf, StorageError> {
        let dir = self.namespace_dir(id);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Lists regular files in a namespace, sorted by name
    ///
    /// A namespace that was never created lists as empty.
    pub async fn list(&self, id: &NamespaceId) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(self.namespace_dir(id)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Sanitizes `filename` and writes `bytes` under it, overwriting any
    /// existing file of the same name
    ///
    /// Returns the name the file was stored under.
    ///
    /// # Errors
    ///
    /// - `InvalidFilename` if nothing is left after sanitizing
    /// - `DisallowedExtension` if the name is not on the allow-list
    /// - `Io` on filesystem failure
    pub async fn save(
        &self,
        id: &NamespaceId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let safe_name = sanitize(filename);
        if safe_name.is_empty() {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }
        if !is_allowed(filename) || !is_allowed(&safe_name) {
            return Err(StorageError::DisallowedExtension(safe_name));
        }

        let dir = self.ensure_namespace(id).await?;
        tokio::fs::write(dir.join(&safe_name), bytes).await?;

        debug!(namespace = %id, filename = %safe_name, size = bytes.len(), "Stored file");
        Ok(safe_name)
    }

    /// Maps a requested name to a path inside the namespace
    ///
    /// Only names that are already in sanitized form are accepted. Every
    /// stored file has such a name, while any traversal attempt does not.
    fn resolve(&self, id: &NamespaceId, filename: &str) -> Result<PathBuf, StorageError> {
        if filename.is_empty() || sanitize(filename) != filename {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        Ok(self.namespace_dir(id).join(filename))
    }

    /// Opens a stored file for sending as an attachment
    ///
    /// # Errors
    ///
    /// `NotFound` if the name is not canonical, the file is absent, or the
    /// entry is not a regular file.
    pub async fn open_for_download(
        &self,
        id: &NamespaceId,
        filename: &str,
    ) -> Result<Download, StorageError> {
        let path = self.resolve(id, filename)?;

        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        Ok(Download {
            filename: filename.to_string(),
            file,
            len: metadata.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::namespace::derive;
    use tokio::io::AsyncReadExt;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uploads"));
        (dir, store)
    }

    async fn read_back(store: &FileStore, ns: &NamespaceId, name: &str) -> Vec<u8> {
        let mut download = store.open_for_download(ns, name).await.unwrap();
        let mut buf = Vec::new();
        download.file.read_to_end(&mut buf).await.unwrap();
        assert_eq!(download.len, buf.len() as u64);
        buf
    }

    #[tokio::test]
    async fn test_list_missing_namespace_is_empty() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");

        assert!(store.list(&ns).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_namespace_is_idempotent() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");

        let first = store.ensure_namespace(&ns).await.unwrap();
        let second = store.ensure_namespace(&ns).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(store.list(&ns).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");
        let payload: Vec<u8> = (0..=255u8).collect();

        let name = store.save(&ns, "image.png", &payload).await.unwrap();
        assert_eq!(name, "image.png");
        assert_eq!(read_back(&store, &ns, "image.png").await, payload);
    }

    #[tokio::test]
    async fn test_save_overwrites_silently() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");

        store.save(&ns, "a.txt", b"first").await.unwrap();
        store.save(&ns, "a.txt", b"second").await.unwrap();

        assert_eq!(store.list(&ns).await.unwrap(), vec!["a.txt".to_string()]);
        assert_eq!(read_back(&store, &ns, "a.txt").await, b"second");
    }

    #[tokio::test]
    async fn test_save_sanitizes_name() {
        let (dir, store) = store();
        let ns = derive("alice", "hash");

        let name = store.save(&ns, "../../escape.txt", b"x").await.unwrap();

        assert_eq!(name, "escape.txt");
        assert!(store.namespace_dir(&ns).join("escape.txt").is_file());
        assert!(!dir.path().join("uploads").join("escape.txt").exists());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_save_rejects_disallowed_extension() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");

        let result = store.save(&ns, "virus.exe", b"MZ").await;

        assert!(matches!(result, Err(StorageError::DisallowedExtension(_))));
        assert!(store.list(&ns).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_empty_name() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");

        assert!(matches!(
            store.save(&ns, "", b"x").await,
            Err(StorageError::InvalidFilename(_))
        ));
        assert!(matches!(
            store.save(&ns, "../..", b"x").await,
            Err(StorageError::InvalidFilename(_))
        ));
    }

    #[tokio::test]
    async fn test_download_rejects_traversal() {
        let (dir, store) = store();
        let ns = derive("alice", "hash");
        store.ensure_namespace(&ns).await.unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();

        for name in ["../../secret.txt", "../secret.txt", "..", ".", "", "/etc/passwd"] {
            assert!(
                matches!(
                    store.open_for_download(&ns, name).await,
                    Err(StorageError::NotFound(_))
                ),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_download_missing_file() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");

        assert!(matches!(
            store.open_for_download(&ns, "nope.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let (_dir, store) = store();
        let alice = derive("alice", "hash-a");
        let bob = derive("bob", "hash-b");

        store.save(&alice, "mine.txt", b"alice only").await.unwrap();

        assert!(store.list(&bob).await.unwrap().is_empty());
        assert!(matches!(
            store.open_for_download(&bob, "mine.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_directories() {
        let (_dir, store) = store();
        let ns = derive("alice", "hash");
        let dir = store.ensure_namespace(&ns).await.unwrap();
        std::fs::create_dir(dir.join("subdir")).unwrap();
        store.save(&ns, "b.txt", b"b").await.unwrap();
        store.save(&ns, "a.txt", b"a").await.unwrap();

        assert_eq!(
            store.list(&ns).await.unwrap(),
            vec!["a.txt".to_string(), "b.txt".to_string()]
        );
    }
}
