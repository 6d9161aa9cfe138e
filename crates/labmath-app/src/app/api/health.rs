use labmath_core::constants::SERVICE_NAME;
use salvo::prelude::*;

use crate::error::AppResult;
use crate::mirror_handler::get_mirror_from_depot;

#[derive(Debug, serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: String,
    site_connected: bool,
    site_message: String,
}

/// ## Summary
/// Liveness endpoint. Also reports whether the public site answers.
#[handler]
async fn health(depot: &mut Depot) -> AppResult<Json<HealthResponse>> {
    let mirror = get_mirror_from_depot(depot)?;
    let site = mirror.health().await;

    Ok(Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
        site_connected: site.connected,
        site_message: site.message,
    }))
}

pub fn routes() -> Router {
    Router::with_path("health").get(health)
}
