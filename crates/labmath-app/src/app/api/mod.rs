mod auth;
mod dashboard;
mod health;
mod records;
mod sync;
mod upload;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

pub use labmath_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, RECORDS_ROUTE_COMPONENT, RECORDS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the admin API router.
///
/// The health check and login are public; every other route sits behind
/// [`AuthMiddleware`].
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(health::routes())
        .push(auth::public_routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(auth::routes())
                .push(dashboard::routes())
                .push(sync::routes())
                .push(upload::routes())
                .push(records::routes()),
        )
}
