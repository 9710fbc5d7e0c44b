/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BLOB PRIMARY KEY NOT NULL,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     namespace TEXT NOT NULL UNIQUE,
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// Users are append-only: this module has no update or delete. The
/// `namespace` column holds the storage digest computed once at creation,
/// so the directory a user's files live in never moves.
///
/// # Example
///
/// ```no_run
/// use cabinet_shared::models::user::{User, CreateUser};
/// use sqlx::{SqliteExecutor, SqlitePool};
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser::new("alice", "$argon2id$...")).await?;
/// let found = User::find_by_username(&pool, "alice").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::storage::namespace::{derive, NamespaceId};

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id password hash (PHC string), never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Hex digest naming this user's upload directory
    pub namespace: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Parses the stored namespace column
    ///
    /// `None` means the row holds something other than a 64-char hex
    /// digest and must not be used as a path.
    pub fn namespace_id(&self) -> Option<NamespaceId> {
        NamespaceId::parse(&self.namespace)
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Storage namespace derived from username and hash
    pub namespace: NamespaceId,
}

impl CreateUser {
    /// Builds creation input, deriving the namespace from the credentials
    pub fn new(username: &str, password_hash: &str) -> Self {
        Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            namespace: derive(username, password_hash),
        }
    }
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// A duplicate username surfaces as a database error whose
    /// `is_unique_violation()` is true. The constraint check is atomic, so
    /// concurrent registrations of the same name cannot both succeed.
    ///
    /// Accepts a pool or an open transaction. The statement runs to
    /// completion with `execute`, so nothing is left pending on the
    /// connection.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            namespace: data.namespace.as_str().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, namespace, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.namespace)
        .bind(user.created_at)
        .execute(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact (case-sensitive) username
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, namespace, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
