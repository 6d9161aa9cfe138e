//! Depot helpers for the authentication context of a Salvo request.

use std::sync::Arc;

use crate::auth::{AdminIdentity, Authenticator, SessionStore};
use crate::error::{ServiceError, ServiceResult};

pub mod depot_keys {
    pub const AUTHENTICATED_ADMIN: &str = "__authenticated_admin";
    pub const AUTHENTICATOR: &str = "__authenticator";
    pub const SESSIONS: &str = "__sessions";
}

/// Get the authenticated administrator from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if the auth middleware did not store an identity.
pub fn get_identity_from_depot(depot: &salvo::Depot) -> ServiceResult<&AdminIdentity> {
    depot
        .get::<AdminIdentity>(depot_keys::AUTHENTICATED_ADMIN)
        .map_err(|_missing| ServiceError::NotAuthenticated)
}

/// Get the configured authenticator from the depot.
///
/// ## Errors
///
/// Returns `InvalidConfiguration` if no authenticator was injected.
pub fn get_authenticator_from_depot(
    depot: &salvo::Depot,
) -> ServiceResult<&Arc<dyn Authenticator>> {
    depot
        .get::<Arc<dyn Authenticator>>(depot_keys::AUTHENTICATOR)
        .map_err(|_missing| {
            ServiceError::InvalidConfiguration("Authenticator not found in depot".to_string())
        })
}

/// Get the session store from the depot.
///
/// ## Errors
///
/// Returns `InvalidConfiguration` if no session store was injected.
pub fn get_sessions_from_depot(depot: &salvo::Depot) -> ServiceResult<&Arc<SessionStore>> {
    depot
        .get::<Arc<SessionStore>>(depot_keys::SESSIONS)
        .map_err(|_missing| {
            ServiceError::InvalidConfiguration("Session store not found in depot".to_string())
        })
}
