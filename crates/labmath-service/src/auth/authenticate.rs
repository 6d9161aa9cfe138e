use std::sync::Arc;

use labmath_core::config::AuthConfig;

use crate::auth::password::{hash_password, validate_hash, verify_password};
use crate::error::{ServiceError, ServiceResult};

/// The administrator a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AdminIdentity {
    pub username: String,
}

/// Strategy for checking administrator credentials.
///
/// Handlers only depend on this trait, so the static credential check can be
/// swapped for another backend without touching the control surface.
pub trait Authenticator: Send + Sync {
    /// ## Summary
    /// Checks a username and password pair.
    ///
    /// ## Errors
    /// Returns `NotAuthenticated` if the credentials are not accepted.
    fn authenticate(&self, username: &str, password: &str) -> ServiceResult<AdminIdentity>;
}

/// ## Summary
/// Runs `authenticator` on tokio's blocking pool.
///
/// Argon2 verification is CPU-bound; request handlers call this instead of
/// `Authenticator::authenticate` so the async workers keep serving.
///
/// ## Errors
/// Returns whatever the authenticator returns, or `TaskFailed` if the
/// blocking task panicked.
pub async fn authenticate_blocking(
    authenticator: Arc<dyn Authenticator>,
    username: String,
    password: String,
) -> ServiceResult<AdminIdentity> {
    tokio::task::spawn_blocking(move || authenticator.authenticate(&username, &password))
        .await
        .map_err(|err| ServiceError::TaskFailed(err.to_string()))?
}

/// A single configured administrator whose password is held as an Argon2 hash.
#[derive(Clone)]
pub struct StaticCredentialAuthenticator {
    username: String,
    password_hash: String,
}

impl std::fmt::Debug for StaticCredentialAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialAuthenticator")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl StaticCredentialAuthenticator {
    /// ## Summary
    /// Builds the authenticator from the `auth` configuration section.
    ///
    /// A configured `password_hash` is used as is; otherwise the plaintext
    /// `password` is hashed once here and then discarded.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if neither a hash nor a password is
    /// configured, or if the configured hash cannot be parsed.
    #[tracing::instrument(skip(config), fields(username = %config.username))]
    pub fn from_config(config: &AuthConfig) -> ServiceResult<Self> {
        let password_hash = match (&config.password_hash, &config.password) {
            (Some(hash), _) => {
                validate_hash(hash)?;
                hash.clone()
            }
            (None, Some(password)) => {
                tracing::debug!("Hashing configured plaintext admin password");
                hash_password(password)?
            }
            (None, None) => {
                return Err(ServiceError::InvalidConfiguration(
                    "Either auth.password_hash or auth.password must be set".to_string(),
                ));
            }
        };

        Ok(Self {
            username: config.username.clone(),
            password_hash,
        })
    }
}

impl Authenticator for StaticCredentialAuthenticator {
    #[tracing::instrument(skip(self, password))]
    fn authenticate(&self, username: &str, password: &str) -> ServiceResult<AdminIdentity> {
        if username != self.username {
            tracing::debug!("Unknown admin username");
            return Err(ServiceError::NotAuthenticated);
        }

        verify_password(password, &self.password_hash)?;

        Ok(AdminIdentity {
            username: self.username.clone(),
        })
    }
}
