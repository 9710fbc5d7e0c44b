/// Error handling for the web server
///
/// Handlers return `WebResult<T>`; every failure is turned into a page or
/// a redirect at the route boundary and never takes the server down.
///
/// | Variant | Response |
/// |---|---|
/// | `Unauthenticated` | `303 See Other` to `/login` |
/// | `BadRequest` | `400` error page |
/// | `NotFound` | `404` error page |
/// | `PayloadTooLarge` | `413` error page |
/// | `Internal` | `500` error page; details logged, never shown |
///
/// # Example
///
/// ```
/// use cabinet_web::error::{WebError, WebResult};
///
/// fn lookup(found: bool) -> WebResult<&'static str> {
///     if !found {
///         return Err(WebError::NotFound("No such file".to_string()));
///     }
///     Ok("contents")
/// }
/// ```

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use cabinet_shared::{
    auth::{credentials::CredentialError, password::PasswordError, session::SessionError},
    storage::StorageError,
};
use std::fmt;

use crate::templates;

/// Result type alias for handlers
pub type WebResult<T> = Result<T, WebError>;

/// Unified web error type
#[derive(Debug)]
pub enum WebError {
    /// No valid session; the client is sent to the login page
    Unauthenticated,

    /// Malformed request (400)
    BadRequest(String),

    /// Missing or inaccessible resource (404)
    NotFound(String),

    /// Upload exceeds the configured body limit (413)
    PayloadTooLarge(String),

    /// Internal server error (500)
    Internal(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Unauthenticated => write!(f, "Unauthenticated"),
            WebError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            WebError::NotFound(msg) => write!(f, "Not found: {}", msg),
            WebError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            WebError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WebError {}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Unauthenticated => Redirect::to("/login").into_response(),
            WebError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                templates::error_page("Bad request", &msg),
            )
                .into_response(),
            WebError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                templates::error_page("Not found", &msg),
            )
                .into_response(),
            WebError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                templates::error_page("Upload too large", &msg),
            )
                .into_response(),
            WebError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    templates::error_page("Something went wrong", "An internal error occurred"),
                )
                    .into_response()
            }
        }
    }
}

impl From<sqlx::Error> for WebError {
    fn from(err: sqlx::Error) -> Self {
        WebError::Internal(format!("Database error: {}", err))
    }
}

impl From<StorageError> for WebError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => WebError::NotFound("File not found".to_string()),
            StorageError::InvalidFilename(_) | StorageError::DisallowedExtension(_) => {
                WebError::BadRequest(err.to_string())
            }
            StorageError::Io(e) => WebError::Internal(format!("Storage error: {}", e)),
        }
    }
}

impl From<CredentialError> for WebError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::UsernameTaken => WebError::BadRequest(err.to_string()),
            CredentialError::Password(e) => e.into(),
            CredentialError::Database(e) => e.into(),
            CredentialError::Storage(e) => e.into(),
        }
    }
}

impl From<PasswordError> for WebError {
    fn from(err: PasswordError) -> Self {
        WebError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<SessionError> for WebError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::CreateError(msg) => WebError::Internal(msg),
            SessionError::Invalid(_) | SessionError::Expired => WebError::Unauthenticated,
        }
    }
}

impl From<MultipartError> for WebError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => {
                WebError::PayloadTooLarge("The file exceeds the upload size limit".to_string())
            }
            _ => WebError::BadRequest(format!("Malformed upload: {}", err.body_text())),
        }
    }
}
