/// Storage namespace derivation
///
/// A namespace is the SHA-256 digest of `username ++ password_hash`,
/// rendered as 64 lowercase hex characters. It names the user's directory
/// under the uploads root.
///
/// ```
/// use cabinet_shared::storage::namespace::derive;
///
/// let a = derive("alice", "$argon2id$v=19$...");
/// let b = derive("alice", "$argon2id$v=19$...");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```

use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a namespace identifier in hex characters
pub const NAMESPACE_LEN: usize = 64;

/// Directory name of one user's storage namespace
///
/// Always exactly 64 lowercase hex characters, so it is safe to join onto
/// the uploads root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceId(String);

impl NamespaceId {
    /// Accepts only a well-formed digest
    pub fn parse(value: &str) -> Option<Self> {
        let well_formed = value.len() == NAMESPACE_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        well_formed.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the namespace for a user from username and password hash
pub fn derive(username: &str, password_hash: &str) -> NamespaceId {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password_hash.as_bytes());

    NamespaceId(hex::encode(hasher.finalize()))
}
