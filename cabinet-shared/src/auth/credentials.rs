/// Credential store: registration and login
///
/// Registration relies on the `UNIQUE` constraint on `users.username`: the
/// insert either succeeds or fails atomically, so two concurrent
/// registrations of one name can never both succeed.
///
/// Login failures are deliberately undifferentiated. An unknown username
/// and a wrong password both yield `Ok(None)`, and an unknown username
/// still pays for one Argon2 verification so response timing does not
/// reveal which usernames exist.
///
/// # Example
///
/// ```no_run
/// use cabinet_shared::auth::credentials::{authenticate, register};
/// use cabinet_shared::storage::FileStore;
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let files = FileStore::new("uploads");
/// register(&pool, &files, "alice", "correct horse").await?;
///
/// let user = authenticate(&pool, "alice", "correct horse").await?;
/// assert!(user.is_some());
/// # Ok(())
/// # }
/// ```

use sqlx::SqlitePool;
use std::sync::OnceLock;
use tracing::{info, warn};

use super::password::{hash_password, verify_password, PasswordError};
use crate::models::user::{CreateUser, User};
use crate::storage::{FileStore, StorageError};

/// Error type for credential store operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Registration with a username that already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// Hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database failure other than the duplicate-username constraint
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Namespace directory could not be created
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Runs a CPU-heavy password operation off the async executor
async fn blocking<T, F>(op: F) -> Result<T, PasswordError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
}

/// Hash verified against when the username does not exist
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("cabinet-timing-equalizer").ok())
        .as_deref()
}

/// Creates an account and provisions its empty namespace directory
///
/// The insert and the directory creation form one unit: the row is only
/// committed once the directory exists, so a storage failure leaves no
/// account behind and the username stays free.
///
/// # Errors
///
/// - `UsernameTaken` if the username already exists
/// - `Password`, `Database`, or `Storage` on infrastructure failure
pub async fn register(
    pool: &SqlitePool,
    files: &FileStore,
    username: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let password = password.to_string();
    let password_hash = blocking(move || hash_password(&password)).await?;

    let data = CreateUser::new(username, &password_hash);
    let namespace = data.namespace.clone();

    let mut tx = pool.begin().await?;

    let user = match User::create(&mut *tx, data).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            info!(username = %username, "Registration rejected: username taken");
            return Err(CredentialError::UsernameTaken);
        }
        Err(e) => return Err(e.into()),
    };

    // Dropping `tx` on error rolls the insert back
    if let Err(e) = files.ensure_namespace(&namespace).await {
        warn!(username = %username, error = %e, "Could not create namespace directory");
        return Err(e.into());
    }

    tx.commit().await?;

    info!(user_id = %user.id, username = %user.username, "Registered new user");
    Ok(user)
}

/// Checks a username/password pair
///
/// Returns the user on success and `None` for any mismatch, without
/// revealing whether the username exists.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, CredentialError> {
    let user = User::find_by_username(pool, username).await?;
    let password = password.to_string();

    let Some(user) = user else {
        let _ = blocking(move || match dummy_hash() {
            Some(hash) => verify_password(&password, hash),
            None => Ok(false),
        })
        .await;
        return Ok(None);
    };

    let stored = user.password_hash.clone();
    let valid = blocking(move || verify_password(&password, &stored)).await?;

    Ok(valid.then_some(user))
}

/// Number of registered accounts
pub async fn count_users(pool: &SqlitePool) -> Result<i64, CredentialError> {
    Ok(User::count(pool).await?)
}
