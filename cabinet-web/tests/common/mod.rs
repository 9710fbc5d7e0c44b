/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Fresh SQLite database and uploads root in a temporary directory
/// - Router built exactly as the server builds it
/// - Helpers for registering, logging in, and uploading

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use cabinet_shared::{
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig as PoolConfig},
    },
    storage::FileStore,
};
use cabinet_web::{
    app::{build_router, AppState},
    config::{
        Config, DatabaseConfig, ServerConfig, SessionConfig, StorageConfig,
        DEFAULT_MAX_UPLOAD_BYTES,
    },
    middleware::session::SESSION_COOKIE,
};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "cabinet-test-boundary";

/// Test context containing all necessary resources
pub struct TestContext {
    /// Keeps the database file and uploads root alive
    pub dir: TempDir,
    pub db: SqlitePool,
    pub files: FileStore,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with a fresh database and uploads root
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_upload_limit(DEFAULT_MAX_UPLOAD_BYTES).await
    }

    /// Same as [`TestContext::new`] with a custom upload body limit
    pub async fn with_upload_limit(max_upload_bytes: usize) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let db_url = format!("sqlite://{}", dir.path().join("users.db").display());

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production: false,
            },
            database: DatabaseConfig {
                url: db_url.clone(),
                max_connections: 5,
            },
            storage: StorageConfig {
                upload_dir: dir.path().join("uploads"),
                max_upload_bytes,
            },
            session: SessionConfig {
                secret: "integration-test-secret-at-least-32-bytes".to_string(),
                ttl_hours: 1,
            },
        };

        let db = create_pool(PoolConfig {
            url: db_url,
            ..Default::default()
        })
        .await?;
        run_migrations(&db).await?;

        let files = FileStore::new(&config.storage.upload_dir);
        files.init().await?;

        let app = build_router(AppState::new(db.clone(), files.clone(), config.clone()));

        Ok(TestContext {
            dir,
            db,
            files,
            app,
            config,
        })
    }

    /// Sends one request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// GET, optionally with a session cookie
    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST an urlencoded form
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form("/register", &[("username", username), ("password", password)])
            .await
    }

    /// Logs in and returns the `Cookie` header value for the new session
    pub async fn login(&self, username: &str, password: &str) -> Option<String> {
        let response = self
            .post_form("/login", &[("username", username), ("password", password)])
            .await;
        session_cookie(&response)
    }

    /// Registers and logs in, returning the session cookie
    pub async fn signed_in(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        self.login(username, password)
            .await
            .expect("login should set a session cookie")
    }

    /// Uploads `content` as the `document` field
    pub async fn upload(&self, session: &str, filename: &str, content: &[u8]) -> Response<Body> {
        self.upload_field(session, "document", filename, content).await
    }

    /// Uploads `content` under an arbitrary multipart field name
    pub async fn upload_field(
        &self,
        session: &str,
        field: &str,
        filename: &str,
        content: &[u8],
    ) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::COOKIE, session)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(field, filename, content)))
            .unwrap();
        self.send(request).await
    }
}

/// Extracts `cabinet_session=...` from a `Set-Cookie` header
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .is_some_and(|value| !value.is_empty())
        })
        .map(str::to_string)
}

/// Builds a single-field multipart body
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Reads a response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn form_encode(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
