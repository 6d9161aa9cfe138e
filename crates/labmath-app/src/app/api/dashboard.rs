use labmath_service::content::stats::{DashboardStats, dashboard as collect_stats};
use salvo::prelude::*;

use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use crate::mirror_handler::get_mirror_from_depot;

#[derive(Debug, serde::Serialize)]
struct DashboardResponse {
    success: bool,
    #[serde(flatten)]
    stats: DashboardStats,
}

#[handler]
async fn dashboard(depot: &mut Depot) -> AppResult<Json<DashboardResponse>> {
    let provider = get_db_from_depot(depot)?;
    let mirror = get_mirror_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let stats = collect_stats(&mut conn, &mirror).await?;

    Ok(Json(DashboardResponse {
        success: true,
        stats,
    }))
}

pub fn routes() -> Router {
    Router::with_path("dashboard").get(dashboard)
}
