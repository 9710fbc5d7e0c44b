/// Middleware modules for the web server
///
/// - `security`: hardening headers on every response
/// - `session`: session cookie handling and the document-route guard

pub mod security;
pub mod session;
