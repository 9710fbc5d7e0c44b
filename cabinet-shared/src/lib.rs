//! # Cabinet Shared Library
//!
//! Core types and business logic for the file cabinet: accounts, sessions,
//! per-user storage namespaces, and content search. The web server in
//! `cabinet-web` is a thin HTTP layer on top of this crate.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session tokens, and the credential store
//! - `db`: SQLite connection pool and embedded migrations
//! - `models`: Database models
//! - `storage`: Namespace derivation, file store, filename sanitizing, search

pub mod auth;
pub mod db;
pub mod models;
pub mod storage;

/// Current version of the cabinet shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
