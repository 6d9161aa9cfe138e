use std::sync::Arc;

use salvo::Depot;
use salvo::basic_auth;
use salvo::http::HeaderValue;
use salvo::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use salvo::writing::Scribe;

use crate::error::{AppError, AppResult};
use labmath_core::constants::SESSION_COOKIE;
use labmath_service::auth::depot::depot_keys;
use labmath_service::auth::{
    AdminIdentity, authenticate_blocking, get_authenticator_from_depot, get_sessions_from_depot,
};
use labmath_service::error::ServiceError;

const BASIC_CHALLENGE: &str = "Basic realm=\"labmath-admin\"";

/// ## Summary
/// Authentication middleware for the admin API.
///
/// A request is accepted when it carries a live session cookie or HTTP Basic
/// credentials the configured authenticator accepts.
///
/// ## Side Effects
/// Inserts the authenticated `AdminIdentity` into the depot for downstream handlers.
///
/// ## Errors
/// Responds with HTTP 401 and a JSON error body if neither credential is valid.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
        let credentials = basic_credentials(req);

        match resolve_identity(token, credentials, depot).await {
            Ok(Some(identity)) => {
                tracing::debug!(username = %identity.username, "Admin authenticated");
                depot.insert(depot_keys::AUTHENTICATED_ADMIN, identity);
            }
            Ok(None) => {
                res.headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
                AppError::from(ServiceError::NotAuthenticated).render(res);
                ctrl.skip_rest();
            }
            Err(err) => {
                err.render(res);
                ctrl.skip_rest();
            }
        }
    }
}

/// Middleware handler for authentication.
/// Use this as a hoop on routers that require a logged-in administrator.
pub struct AuthMiddleware;

async fn resolve_identity(
    token: Option<String>,
    credentials: Option<(String, String)>,
    depot: &Depot,
) -> AppResult<Option<AdminIdentity>> {
    if let Some(token) = token {
        let sessions = Arc::clone(get_sessions_from_depot(depot)?);
        if let Some(identity) = sessions.get(&token).await {
            return Ok(Some(identity));
        }
        tracing::debug!("Unknown or expired session cookie");
    }

    let Some((username, password)) = credentials else {
        return Ok(None);
    };

    let authenticator = Arc::clone(get_authenticator_from_depot(depot)?);
    match authenticate_blocking(authenticator, username, password).await {
        Ok(identity) => Ok(Some(identity)),
        Err(ServiceError::NotAuthenticated) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// ## Summary
/// Extracts the username and password from an `Authorization: Basic` header.
///
/// Returns `None` when the header is missing, uses another scheme or is malformed.
fn basic_credentials(req: &salvo::Request) -> Option<(String, String)> {
    basic_auth::parse_credentials(req, &[AUTHORIZATION]).ok()
}
