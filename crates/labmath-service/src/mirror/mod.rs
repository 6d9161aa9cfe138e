//! Client for the public website that mirrors local content.
//!
//! Every call is a single best-effort attempt with a fixed timeout. Failures
//! are reported as [`MirrorOutcome`] values rather than errors; the caller
//! decides what to record.

pub mod payload;

use labmath_core::config::RemoteConfig;
use labmath_core::constants::{
    API_KEY_HEADER, CONTENT_TIMEOUT, HEALTH_TIMEOUT, MAX_SYNC_MESSAGE_CHARS, REMOTE_API_PREFIX,
    REMOTE_HEALTH_PATH, REMOTE_UPLOAD_PATH, UPLOAD_TIMEOUT,
};
use labmath_core::types::RecordKind;
use labmath_core::util::text::truncate_chars;
use labmath_db::model::record::ContentRecord;
use reqwest::StatusCode;

use crate::error::{ServiceError, ServiceResult};
use payload::RecordPayload;

pub const SYNCED_MESSAGE: &str = "Synced";
pub const DELETED_MESSAGE: &str = "Deleted";
pub const NOT_SYNCED_MESSAGE: &str = "not synced";
pub const NO_API_KEY_MESSAGE: &str = "API key not configured";
pub const CONNECTED_MESSAGE: &str = "Connected";
pub const UNREACHABLE_MESSAGE: &str = "Site unreachable";

/// Result of one mirror call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOutcome {
    pub ok: bool,
    pub message: String,
    /// Whether a network call was made. Guard-clause refusals are not attempts.
    pub attempted: bool,
}

impl MirrorOutcome {
    fn skipped(message: &str) -> Self {
        Self {
            ok: false,
            message: message.to_string(),
            attempted: false,
        }
    }

    fn succeeded(message: &str) -> Self {
        Self {
            ok: true,
            message: message.to_string(),
            attempted: true,
        }
    }

    fn failed(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            truncate_chars(message, MAX_SYNC_MESSAGE_CHARS)
        };
        Self {
            ok: false,
            message,
            attempted: true,
        }
    }

    fn status(status: StatusCode) -> Self {
        Self::failed(&format!("HTTP {}", status.as_u16()))
    }
}

/// Reachability of the remote site as seen by the health check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SiteHealth {
    pub connected: bool,
    pub message: String,
}

/// A file to forward to the remote upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Result of forwarding an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The remote accepted the file; its JSON reply is passed through untouched.
    Relayed(serde_json::Value),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct MirrorClient {
    http: reqwest::Client,
    remote: RemoteConfig,
}

impl MirrorClient {
    /// ## Summary
    /// Builds a client for the site described by `remote`.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if the HTTP client cannot be constructed.
    pub fn new(remote: RemoteConfig) -> ServiceResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("labmath-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ServiceError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { http, remote })
    }

    #[must_use]
    pub fn api_key_configured(&self) -> bool {
        self.remote.api_key().is_some()
    }

    fn record_url(&self, kind: RecordKind, id: i32) -> String {
        self.remote.endpoint(&format!(
            "{REMOTE_API_PREFIX}/{}/{id}",
            kind.remote_collection()
        ))
    }

    /// ## Summary
    /// Sends the current state of `record` to the remote site.
    ///
    /// Refuses without a network call when no API key is configured or when
    /// the record's visibility flag is off. Succeeds only on HTTP 200 or 201.
    #[tracing::instrument(skip(self, record), fields(kind = %record.kind(), id = record.id()))]
    pub async fn push(&self, record: &ContentRecord) -> MirrorOutcome {
        let Some(api_key) = self.remote.api_key() else {
            tracing::debug!("Skipping mirror push, no API key configured");
            return MirrorOutcome::skipped(NO_API_KEY_MESSAGE);
        };
        if !record.is_visible() {
            tracing::debug!("Skipping mirror push, record is hidden");
            return MirrorOutcome::skipped(NOT_SYNCED_MESSAGE);
        }

        let url = self.record_url(record.kind(), record.id());
        let result = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .timeout(CONTENT_TIMEOUT)
            .json(&RecordPayload::from(record))
            .send()
            .await;

        let outcome = match result {
            Ok(response) if matches!(response.status(), StatusCode::OK | StatusCode::CREATED) => {
                MirrorOutcome::succeeded(SYNCED_MESSAGE)
            }
            Ok(response) => MirrorOutcome::status(response.status()),
            Err(err) => MirrorOutcome::failed(&describe_network_error(&err)),
        };

        if outcome.ok {
            tracing::info!(%url, "Record mirrored");
        } else {
            tracing::warn!(%url, message = %outcome.message, "Mirror push failed");
        }

        outcome
    }

    /// ## Summary
    /// Removes a record from the remote site. Succeeds only on HTTP 200 or 204.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, kind: RecordKind, id: i32) -> MirrorOutcome {
        let Some(api_key) = self.remote.api_key() else {
            tracing::debug!("Skipping mirror delete, no API key configured");
            return MirrorOutcome::skipped(NO_API_KEY_MESSAGE);
        };

        let url = self.record_url(kind, id);
        let result = self
            .http
            .delete(&url)
            .header(API_KEY_HEADER, api_key)
            .timeout(CONTENT_TIMEOUT)
            .send()
            .await;

        let outcome = match result {
            Ok(response)
                if matches!(response.status(), StatusCode::OK | StatusCode::NO_CONTENT) =>
            {
                MirrorOutcome::succeeded(DELETED_MESSAGE)
            }
            Ok(response) => MirrorOutcome::status(response.status()),
            Err(err) => MirrorOutcome::failed(&describe_network_error(&err)),
        };

        if outcome.ok {
            tracing::info!(%url, "Record removed from mirror");
        } else {
            tracing::warn!(%url, message = %outcome.message, "Mirror delete failed");
        }

        outcome
    }

    /// ## Summary
    /// Checks whether the remote site answers its health endpoint with 200.
    #[tracing::instrument(skip(self))]
    pub async fn health(&self) -> SiteHealth {
        if !self.api_key_configured() {
            return SiteHealth {
                connected: false,
                message: NO_API_KEY_MESSAGE.to_string(),
            };
        }

        let result = self
            .http
            .get(self.remote.endpoint(REMOTE_HEALTH_PATH))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => SiteHealth {
                connected: true,
                message: CONNECTED_MESSAGE.to_string(),
            },
            Ok(response) => SiteHealth {
                connected: false,
                message: format!("HTTP {}", response.status().as_u16()),
            },
            Err(err) => {
                tracing::debug!(error = %err, "Remote health check failed");
                SiteHealth {
                    connected: false,
                    message: UNREACHABLE_MESSAGE.to_string(),
                }
            }
        }
    }

    /// ## Summary
    /// Forwards an uploaded file to the remote site as a multipart `file` part.
    ///
    /// On HTTP 200 the remote's JSON reply is returned as is.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload(&self, file: UploadFile) -> UploadOutcome {
        let Some(api_key) = self.remote.api_key() else {
            return UploadOutcome::Failed(NO_API_KEY_MESSAGE.to_string());
        };

        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = match part.mime_str(content_type) {
                Ok(part) => part,
                Err(err) => {
                    return UploadOutcome::Failed(format!("Invalid content type: {err}"));
                }
            };
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let result = self
            .http
            .post(self.remote.endpoint(REMOTE_UPLOAD_PATH))
            .header(API_KEY_HEADER, api_key)
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.json::<serde_json::Value>().await {
                    Ok(body) => UploadOutcome::Relayed(body),
                    Err(err) => UploadOutcome::Failed(truncate_chars(
                        &format!("Invalid response from site: {err}"),
                        MAX_SYNC_MESSAGE_CHARS,
                    )),
                }
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Upload rejected by site");
                UploadOutcome::Failed(format!("HTTP {}", response.status().as_u16()))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Upload forwarding failed");
                UploadOutcome::Failed(truncate_chars(
                    &describe_network_error(&err),
                    MAX_SYNC_MESSAGE_CHARS,
                ))
            }
        }
    }
}

fn describe_network_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        format!("Connection failed: {err}")
    } else {
        err.to_string()
    }
}
