/// Configuration management for the web server
///
/// Loads configuration from environment variables (and a `.env` file when
/// present) into a type-safe struct.
///
/// # Environment Variables
///
/// - `CABINET_HOST`: Host to bind to (default: 0.0.0.0)
/// - `CABINET_PORT`: Port to bind to (default: 5000)
/// - `CABINET_PRODUCTION`: Enables HSTS and `Secure` cookies (default: false)
/// - `DATABASE_URL`: SQLite URL (default: sqlite://users.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `UPLOAD_DIR`: Root directory for user files (default: uploads)
/// - `MAX_UPLOAD_BYTES`: Largest accepted upload body (default: 16 MiB)
/// - `SESSION_SECRET`: Key for signing session cookies (required, >= 32 chars)
/// - `SESSION_TTL_HOURS`: Session lifetime (default: 24)
/// - `RUST_LOG`: Log filter; `LOG_FORMAT=json` switches to JSON output
///
/// # Example
///
/// ```no_run
/// use cabinet_web::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::path::PathBuf;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode: HSTS header and `Secure` session cookie
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// File storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Uploads root; one subdirectory per user namespace
    pub upload_dir: PathBuf,

    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret key for signing session tokens
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Session lifetime in hours
    pub ttl_hours: i64,
}

/// Default upload limit: 16 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `SESSION_SECRET` is missing or shorter than 32
    /// characters, or if a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let port = var_or("CABINET_PORT", "5000").parse::<u16>()?;
        let production = var_or("CABINET_PRODUCTION", "false").parse::<bool>()?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "5").parse::<u32>()?;
        let max_upload_bytes = var_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse::<usize>()?;
        let ttl_hours = var_or("SESSION_TTL_HOURS", "24").parse::<i64>()?;

        let secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        let config = Self {
            server: ServerConfig {
                host: var_or("CABINET_HOST", "0.0.0.0"),
                port,
                production,
            },
            database: DatabaseConfig {
                url: var_or("DATABASE_URL", "sqlite://users.db"),
                max_connections,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(var_or("UPLOAD_DIR", "uploads")),
                max_upload_bytes,
            },
            session: SessionConfig { secret, ttl_hours },
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that the type system cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session.secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters long");
        }
        if self.session.ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive");
        }
        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
