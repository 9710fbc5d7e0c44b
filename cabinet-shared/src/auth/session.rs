/// Session tokens
///
/// A session token is a compact HS256-signed JWT whose subject is the
/// authenticated username. The web layer stores it in an `HttpOnly` cookie;
/// any modification of the cookie breaks the signature and the request is
/// treated as anonymous.
///
/// # Claims
///
/// - `sub`: Username
/// - `iss`: Always `"cabinet"`
/// - `iat` / `nbf`: Issue time (Unix seconds)
/// - `exp`: Expiry (Unix seconds)
///
/// # Example
///
/// ```
/// use cabinet_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = SessionClaims::new("alice");
/// let token = create_session_token(&claims, "your-secret-key")?;
///
/// let validated = validate_session_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer written into and required on every session token
pub const SESSION_ISSUER: &str = "cabinet";

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Signature, format, or issuer check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),

    /// Token is past its expiry
    #[error("Session has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - authenticated username
    pub sub: String,

    /// Issuer - always "cabinet"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    /// Creates claims for `username` with the default lifetime
    pub fn new(username: &str) -> Self {
        Self::with_expiration(username, Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    /// Creates claims for `username` expiring after `expires_in`
    pub fn with_expiration(username: &str, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: username.to_string(),
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }
}

/// Signs claims into a session token using HS256
///
/// # Errors
///
/// Returns `SessionError::CreateError` if encoding fails
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and returns its claims
///
/// Checks signature, issuer, expiry, and not-before.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Issues a token for `username` valid for `ttl_hours`
pub fn issue_session_token(
    username: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, SessionError> {
    let claims = SessionClaims::with_expiration(username, Duration::hours(ttl_hours));
    create_session_token(&claims, secret)
}

/// Resolves a token to the username it was issued for
///
/// Any validation failure is treated as "no session".
pub fn current_user(token: &str, secret: &str) -> Option<String> {
    match validate_session_token(token, secret) {
        Ok(claims) => Some(claims.sub),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            None
        }
    }
}
