//! # File Cabinet Web Server Library
//!
//! HTTP layer of the file cabinet: router, session cookies, HTML pages,
//! and the mapping from domain errors to responses.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers and the session guard
//! - `routes`: Route handlers
//! - `templates`: Escaping HTML builder and page templates

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod templates;
