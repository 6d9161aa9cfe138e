//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Setting up an isolated SQLite database per test
//! - Running an in-process stand-in for the public website
//! - Building the admin service and making authenticated requests
//!
//! ## Database Isolation
//! Each `TestDb` lives in its own temporary directory, which is removed when
//! the value is dropped. Tests therefore run in parallel without contention.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::conn::tcp::TcpAcceptor;
use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};

use labmath_test::app::auth_handler::AuthProviderHandler;
use labmath_test::app::mirror_handler::MirrorClientHandler;
use labmath_test::component::auth::{Authenticator, SessionStore, StaticCredentialAuthenticator};
use labmath_test::component::config::{
    AuthConfig, ConfigHandler, DatabaseConfig, LoggingConfig, RemoteConfig, ServerConfig,
    Settings,
};
use labmath_test::component::constants::{API_KEY_HEADER, SESSION_COOKIE};
use labmath_test::component::db::connection::{
    DbConnection, DbPool, DbProviderHandler, create_pool, run_migrations,
};
pub use labmath_test::component::db::enums::SyncStatus;
use labmath_test::component::db::query::{achievement, activity, announcement, offer, record};
use labmath_test::component::mirror::MirrorClient;
use labmath_test::component::model::achievement::NewAchievement;
use labmath_test::component::model::activity::NewActivity;
use labmath_test::component::model::announcement::NewAnnouncement;
use labmath_test::component::model::offer::NewOffer;
pub use labmath_test::component::model::record::ContentRecord;

pub use labmath_test::component::types::RecordKind;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const TEST_API_KEY: &str = "test-api-key";

/// A remote base URL nothing listens on.
pub const UNREACHABLE_SITE: &str = "http://127.0.0.1:1";

// ============================================================================
// Database
// ============================================================================

/// Per-test SQLite database with migrations applied.
pub struct TestDb {
    _dir: tempfile::TempDir,
    url: String,
    pool: DbPool,
}

impl TestDb {
    /// Creates a fresh database file in a temporary directory.
    ///
    /// ## Errors
    /// Returns an error if the directory, migrations or pool cannot be created.
    pub async fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let url = dir.path().join("labmath.sqlite").to_string_lossy().into_owned();

        run_migrations(&url).await?;
        let pool = create_pool(&url, 4).await?;

        Ok(Self {
            _dir: dir,
            url,
            pool,
        })
    }

    #[must_use]
    pub fn url(&self) -> String {
        self.url.clone()
    }

    #[must_use]
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Gets a connection from the test pool.
    ///
    /// ## Errors
    /// Returns an error if no connection is available.
    pub async fn get_conn(&self) -> anyhow::Result<DbConnection<'_>> {
        Ok(self.pool.get().await?)
    }

    /// Loads a record as currently stored.
    ///
    /// ## Errors
    /// Returns an error if the query fails.
    pub async fn record(&self, kind: RecordKind, id: i32) -> anyhow::Result<Option<ContentRecord>> {
        let mut conn = self.get_conn().await?;
        Ok(record::get_record(&mut conn, kind, id).await?)
    }

    /// Seeds an activity directly, bypassing the mirror.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_activity(&self, title: &str, published: bool) -> anyhow::Result<i32> {
        let mut conn = self.get_conn().await?;
        let created = activity::create_activity(
            &mut conn,
            &NewActivity {
                title,
                description: Some("Seeded description"),
                content: Some("Seeded content"),
                image_url: None,
                author: Some(ADMIN_USERNAME),
                created_at: chrono::Utc::now().naive_utc(),
                is_published: published,
                sync_status: SyncStatus::Pending,
            },
        )
        .await?;
        Ok(created.id)
    }

    /// Seeds an achievement directly, bypassing the mirror.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_achievement(&self, title: &str) -> anyhow::Result<i32> {
        let mut conn = self.get_conn().await?;
        let created = achievement::create_achievement(
            &mut conn,
            &NewAchievement {
                title,
                description: None,
                image_url: None,
                category: Some("recherche"),
                achieved_on: chrono::NaiveDate::from_ymd_opt(2024, 6, 1),
                created_at: chrono::Utc::now().naive_utc(),
                sync_status: SyncStatus::Pending,
            },
        )
        .await?;
        Ok(created.id)
    }

    /// Seeds an announcement directly, bypassing the mirror.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_announcement(&self, title: &str, active: bool) -> anyhow::Result<i32> {
        let mut conn = self.get_conn().await?;
        let created = announcement::create_announcement(
            &mut conn,
            &NewAnnouncement {
                title,
                content: Some("Seeded announcement"),
                announcement_type: Some("info"),
                starts_at: None,
                ends_at: None,
                created_at: chrono::Utc::now().naive_utc(),
                is_active: active,
                sync_status: SyncStatus::Pending,
            },
        )
        .await?;
        Ok(created.id)
    }

    /// Seeds an offer directly, bypassing the mirror.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_offer(&self, title: &str, active: bool) -> anyhow::Result<i32> {
        let mut conn = self.get_conn().await?;
        let created = offer::create_offer(
            &mut conn,
            &NewOffer {
                title,
                description: Some("Seeded offer"),
                offer_type: Some("stage"),
                location: Some("Marrakech"),
                deadline: None,
                created_at: chrono::Utc::now().naive_utc(),
                is_active: active,
                sync_status: SyncStatus::Pending,
            },
        )
        .await?;
        Ok(created.id)
    }
}

// ============================================================================
// Remote site stand-in
// ============================================================================

/// One request received by the [`MockSite`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Parses the request body as JSON.
    ///
    /// ## Panics
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Mirrored body should be JSON")
    }
}

/// Local row checked whenever the site receives a DELETE.
struct RowWatch {
    pool: DbPool,
    kind: RecordKind,
    id: i32,
}

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    status: AtomicU16,
    row_watch: Mutex<Option<RowWatch>>,
    rows_seen_on_delete: Mutex<Vec<bool>>,
}

impl MockState {
    async fn observe_watched_row(&self) {
        let watched = self
            .row_watch
            .lock()
            .expect("Mock state lock")
            .as_ref()
            .map(|w| (w.pool.clone(), w.kind, w.id));
        let Some((pool, kind, id)) = watched else {
            return;
        };

        let mut conn = pool.get().await.expect("Watch connection");
        let present = record::get_record(&mut conn, kind, id)
            .await
            .expect("Watch query")
            .is_some();
        self.rows_seen_on_delete
            .lock()
            .expect("Mock state lock")
            .push(present);
    }
}

struct MockSiteHandler {
    state: Arc<MockState>,
}

#[async_trait]
impl Handler for MockSiteHandler {
    async fn handle(
        &self,
        req: &mut Request,
        _depot: &mut Depot,
        res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let api_key = header(API_KEY_HEADER);
        let content_type = header("content-type");
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let body = req
            .payload()
            .await
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();

        if method == "DELETE" {
            self.state.observe_watched_row().await;
        }

        let is_upload = path.ends_with("/upload");
        self.state
            .requests
            .lock()
            .expect("Mock state lock")
            .push(RecordedRequest {
                method,
                path,
                api_key,
                content_type,
                body,
            });

        let status = StatusCode::from_u16(self.state.status.load(Ordering::SeqCst))
            .unwrap_or(StatusCode::OK);
        res.status_code(status);
        if is_upload && status == StatusCode::OK {
            res.render(Json(serde_json::json!({
                "success": true,
                "url": "/uploads/photo.png",
            })));
        } else {
            res.render(Json(serde_json::json!({ "success": status.is_success() })));
        }
    }
}

/// An in-process HTTP server standing in for the public website.
///
/// Every request is recorded and answered with the configured status
/// (200 by default).
pub struct MockSite {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: tokio::task::JoinHandle<()>,
}

impl MockSite {
    /// Starts the stand-in on an ephemeral local port.
    ///
    /// ## Panics
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Bind mock site listener");
        let addr = listener.local_addr().expect("Mock site address");
        let acceptor = TcpAcceptor::try_from(listener).expect("Mock site acceptor");

        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            status: AtomicU16::new(200),
            row_watch: Mutex::new(None),
            rows_seen_on_delete: Mutex::new(Vec::new()),
        });
        let router = Router::with_path("{**rest}").goal(MockSiteHandler {
            state: Arc::clone(&state),
        });
        let server = tokio::spawn(async move {
            Server::new(acceptor).serve(router).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Remote configuration pointing at this site with the test API key.
    #[must_use]
    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.base_url(),
            api_key: Some(TEST_API_KEY.to_string()),
        }
    }

    /// Makes every following request answer with `status`.
    pub fn respond_with(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    /// All requests received so far, in arrival order.
    ///
    /// ## Panics
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("Mock state lock").clone()
    }

    /// Requests received with the given method and path.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// On every DELETE received from now on, records whether the local row
    /// `(kind, id)` still exists in `pool` at that moment.
    ///
    /// ## Panics
    /// Panics if the state lock is poisoned.
    pub fn watch_row(&self, pool: DbPool, kind: RecordKind, id: i32) {
        let watch = RowWatch { pool, kind, id };
        *self.state.row_watch.lock().expect("Mock state lock") = Some(watch);
    }

    /// For each DELETE seen since [`MockSite::watch_row`], whether the
    /// watched row was still stored locally when it arrived.
    ///
    /// ## Panics
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn rows_seen_on_delete(&self) -> Vec<bool> {
        self.state
            .rows_seen_on_delete
            .lock()
            .expect("Mock state lock")
            .clone()
    }

    /// Forgets every request received so far.
    ///
    /// ## Panics
    /// Panics if the state lock is poisoned.
    pub fn clear(&self) {
        self.state.requests.lock().expect("Mock state lock").clear();
    }
}

impl Drop for MockSite {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// ============================================================================
// Service
// ============================================================================

/// Test configuration - static struct instead of loading from file.
#[must_use]
pub fn test_config(database_url: &str, remote: RemoteConfig) -> Settings {
    Settings {
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 4,
        },
        auth: AuthConfig {
            username: ADMIN_USERNAME.to_string(),
            password: Some(ADMIN_PASSWORD.to_string()),
            password_hash: None,
            session_ttl_secs: 3600,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 10000,
            serve_origin: None,
        },
        remote,
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

/// Creates the admin service wired the way `main` wires it.
///
/// ## Panics
/// Panics if the authenticator or the mirror client cannot be built.
#[must_use]
pub fn create_test_service(test_db: &TestDb, remote: RemoteConfig) -> Service {
    let settings = test_config(&test_db.url(), remote);

    let authenticator: Arc<dyn Authenticator> = Arc::new(
        StaticCredentialAuthenticator::from_config(&settings.auth)
            .expect("Test credentials are valid"),
    );
    let mirror = Arc::new(
        MirrorClient::new(settings.remote.clone()).expect("Mirror client builds"),
    );

    let router = Router::new()
        .hoop(DbProviderHandler {
            provider: test_db.pool(),
        })
        .hoop(ConfigHandler { settings })
        .hoop(MirrorClientHandler { client: mirror })
        .hoop(AuthProviderHandler {
            authenticator,
            sessions: Arc::new(SessionStore::new(Duration::from_secs(3600))),
        })
        .push(labmath_test::app::api::routes());

    Service::new(router)
}

/// Logs in as the test administrator and returns the session token.
///
/// ## Panics
/// Panics if the login is rejected.
pub async fn login(service: &Service) -> String {
    let response = TestRequest::post("/api/auth/login")
        .json_body(&serde_json::json!({
            "username": ADMIN_USERNAME,
            "password": ADMIN_PASSWORD,
        }))
        .send(service)
        .await
        .assert_status(StatusCode::OK);

    response
        .session_cookie
        .expect("Login should set the session cookie")
}

// ============================================================================
// Requests
// ============================================================================

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    /// Creates a new test request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sends the session cookie returned by [`login`].
    #[must_use]
    pub fn session(self, token: &str) -> Self {
        self.header("Cookie", &format!("{SESSION_COOKIE}={token}"))
    }

    /// Sends HTTP Basic credentials.
    #[must_use]
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.header("Authorization", &format!("Basic {encoded}"))
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json_body(self, value: &serde_json::Value) -> Self {
        self.header("Content-Type", "application/json")
            .body(value.to_string())
    }

    /// Sets a `multipart/form-data` body with a single file part.
    #[must_use]
    pub fn multipart_file(
        self,
        field: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Self {
        const BOUNDARY: &str = "labmath-test-boundary";

        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.header(
            "Content-Type",
            &format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
    }

    /// Sends the request to the test service and returns the response.
    ///
    /// ## Panics
    /// Panics if the method is not supported by the helper.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:10000{}", self.path);

        let mut client = match self.method {
            Method::GET => TestClient::get(&url),
            Method::POST => TestClient::post(&url),
            Method::PUT => TestClient::put(&url),
            Method::DELETE => TestClient::delete(&url),
            ref other => panic!("Unsupported test method {other}"),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let session_cookie = response
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            session_cookie,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub session_cookie: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {} with body {}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts that a header is present and contains `expected`.
    #[must_use]
    pub fn assert_header_contains(self, name: &str, expected: &str) -> Self {
        let value = self.get_header(name).unwrap_or_default();
        assert!(
            value.contains(expected),
            "Expected header {name} to contain {expected:?}, got {value:?}"
        );
        self
    }

    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    ///
    /// ## Panics
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Response is not JSON ({e}): {}", self.body_string()))
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Path of a record collection in the admin API.
#[must_use]
pub fn records_path(kind: RecordKind) -> String {
    format!("/api/records/{}", kind.slug())
}

/// Path of a single record in the admin API.
#[must_use]
pub fn record_path(kind: RecordKind, id: i32) -> String {
    format!("{}/{id}", records_path(kind))
}

/// Path the public site exposes a record under.
#[must_use]
pub fn remote_record_path(kind: RecordKind, id: i32) -> String {
    format!("/api/{}/{id}", kind.remote_collection())
}
