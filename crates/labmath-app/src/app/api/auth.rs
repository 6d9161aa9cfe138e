use std::sync::Arc;

use labmath_core::constants::SESSION_COOKIE;
use labmath_service::auth::{
    authenticate_blocking, get_authenticator_from_depot, get_identity_from_depot,
    get_sessions_from_depot,
};
use labmath_service::error::ServiceError;
use salvo::http::cookie::{Cookie, SameSite};
use salvo::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    username: String,
}

#[derive(Debug, Serialize)]
struct LogoutResponse {
    success: bool,
    message: &'static str,
}

/// ## Summary
/// Checks the posted credentials and opens a session.
///
/// ## Side Effects
/// Sets the HTTP-only session cookie on success. The cookie is marked secure
/// when the server is served from an `https` origin.
///
/// ## Errors
/// 400 for a malformed body, 401 for rejected credentials.
#[handler]
async fn login(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<LoginResponse>> {
    let body: LoginRequest = req
        .parse_json()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid login request: {e}")))?;

    let config = get_config_from_depot(depot)?;
    let authenticator = Arc::clone(get_authenticator_from_depot(depot)?);
    let sessions = Arc::clone(get_sessions_from_depot(depot)?);

    let LoginRequest { username, password } = body;
    let identity = match authenticate_blocking(authenticator, username.clone(), password).await {
        Ok(identity) => identity,
        Err(ServiceError::NotAuthenticated) => {
            tracing::info!(%username, "Rejected login attempt");
            return Err(AppError::Unauthorized("Invalid username or password"));
        }
        Err(err) => return Err(err.into()),
    };

    let token = sessions.create(identity.clone()).await;
    res.add_cookie(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(config.server.origin().starts_with("https://"))
            .same_site(SameSite::Lax)
            .build(),
    );

    tracing::info!(username = %identity.username, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        username: identity.username,
    }))
}

/// ## Summary
/// Ends the current session, if the request was made with one.
#[handler]
async fn logout(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<LogoutResponse>> {
    let sessions = Arc::clone(get_sessions_from_depot(depot)?);
    if let Some(token) = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()) {
        sessions.remove(&token).await;
    }
    res.remove_cookie(SESSION_COOKIE);

    tracing::info!(username = %get_identity_from_depot(depot)?.username, "Admin logged out");

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logged out",
    }))
}

pub fn public_routes() -> Router {
    Router::with_path("auth/login").post(login)
}

pub fn routes() -> Router {
    Router::with_path("auth/logout").post(logout)
}
