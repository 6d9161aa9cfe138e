use std::time::Duration;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

/// Eight hours.
const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
}

/// Credentials of the single administrator.
///
/// Either `password_hash` (an Argon2 PHC string) or `password` must be set;
/// the hash wins when both are present.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: Option<String>,
    pub password_hash: Option<String>,
    /// Seconds a login session stays valid.
    pub session_ttl_secs: u64,
}

impl AuthConfig {
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "<redacted>"),
            )
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }
}

/// The external website that receives mirrored records.
#[derive(Clone, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// ## Summary
    /// Returns the configured API key, treating an empty or blank key as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// ## Summary
    /// Joins `path` onto the base URL without doubling the slash between them.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key_configured", &self.api_key().is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `config.toml` and `LABMATH_`-prefixed environment
    /// variables into a `Settings`. Environment variables take precedence over
    /// file values; nested keys use `__`, e.g. `LABMATH_REMOTE__API_KEY`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 10000)?
            .set_default("database.url", "labmath_db.sqlite")?
            .set_default("database.max_connections", 4)?
            .set_default("auth.username", "admin")?
            .set_default("auth.session_ttl_secs", DEFAULT_SESSION_TTL_SECS)?
            .set_default("remote.base_url", "https://labmathscsmaubmar.org")?
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("LABMATH")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
