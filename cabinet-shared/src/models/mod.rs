/// Database models
///
/// # Models
///
/// - `user`: User accounts (username, password hash, storage namespace)

pub mod user;
