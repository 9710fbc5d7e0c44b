/// Per-user document storage
///
/// Every account owns one directory under the uploads root, named by its
/// [`namespace::NamespaceId`]. All file operations take a namespace and a
/// client-supplied filename, and never touch anything outside that
/// directory.
///
/// # Modules
///
/// - [`namespace`]: Digest-based directory names
/// - [`filename`]: Filename sanitizing and the extension allow-list
/// - [`file_store`]: Create, list, save, and open files
/// - [`search`]: Case-insensitive content search

pub mod file_store;
pub mod filename;
pub mod namespace;
pub mod search;

pub use file_store::{Download, FileStore, StorageError};
pub use namespace::NamespaceId;
