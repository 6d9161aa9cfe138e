use std::time::Duration;

/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const RECORDS_ROUTE_COMPONENT: &str = "records";
pub const RECORDS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", RECORDS_ROUTE_COMPONENT);

/// Path of the remote site's API, relative to the configured base URL.
pub const REMOTE_API_PREFIX: &str = "/api";
pub const REMOTE_HEALTH_PATH: &str = const_str::concat!(REMOTE_API_PREFIX, "/health");
pub const REMOTE_UPLOAD_PATH: &str = const_str::concat!(REMOTE_API_PREFIX, "/upload");

/// Header carrying the shared secret expected by the remote site.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "labmath-admin";

/// Cookie holding the admin session token.
pub const SESSION_COOKIE: &str = "labmath_session";

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const CONTENT_TIMEOUT: Duration = Duration::from_secs(10);
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest accepted upload body (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Upper bound on the length, in characters, of a stored or reported sync message.
pub const MAX_SYNC_MESSAGE_CHARS: usize = 100;
