/// Route handlers
///
/// - `auth`: landing page, registration, login, logout
/// - `documents`: listing, upload, download
/// - `search`: content search
/// - `health`: health check endpoint

pub mod auth;
pub mod documents;
pub mod health;
pub mod search;
