/// Content search over a namespace
///
/// A linear scan: every file is read, decoded as UTF-8 with invalid byte
/// sequences dropped, lowercased, and tested for the lowercased query as a
/// substring. There is no index, so each call costs the total size of the
/// namespace.

use tracing::{debug, warn};

use super::file_store::{FileStore, StorageError};
use super::namespace::NamespaceId;

/// Decodes bytes as UTF-8, silently dropping invalid sequences
pub fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Case-insensitive substring test of `query` against decoded `content`
pub fn content_matches(content: &[u8], query: &str) -> bool {
    decode_ignoring_invalid(content)
        .to_lowercase()
        .contains(&query.to_lowercase())
}

impl FileStore {
    /// Returns the names of files whose text contains `query`, ignoring case
    ///
    /// Files that cannot be read are logged and skipped rather than failing
    /// the whole search. An empty query matches every file.
    pub async fn search(
        &self,
        id: &NamespaceId,
        query: &str,
    ) -> Result<Vec<String>, StorageError> {
        let dir = self.namespace_dir(id);
        let mut matches = Vec::new();

        for filename in self.list(id).await? {
            match tokio::fs::read(dir.join(&filename)).await {
                Ok(content) => {
                    if content_matches(&content, query) {
                        matches.push(filename);
                    }
                }
                Err(e) => {
                    warn!(namespace = %id, filename = %filename, error = %e, "Skipping unreadable file");
                }
            }
        }

        debug!(namespace = %id, hits = matches.len(), "Search finished");
        Ok(matches)
    }
}
