/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Signed session tokens carried in the session cookie
/// - [`credentials`]: Registration and login against the users table
///
/// # Example
///
/// ```
/// use cabinet_shared::auth::password::{hash_password, verify_password};
/// use cabinet_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = SessionClaims::new("alice");
/// let token = create_session_token(&claims, "secret-key")?;
/// assert_eq!(validate_session_token(&token, "secret-key")?.sub, "alice");
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod password;
pub mod session;
