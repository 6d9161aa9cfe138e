use labmath_service::sync::sweep::sync_all as sweep;
use salvo::prelude::*;

use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use crate::mirror_handler::get_mirror_from_depot;

#[derive(Debug, serde::Serialize)]
struct SyncAllResponse {
    success: bool,
    synced: usize,
    total: usize,
    message: String,
}

/// ## Summary
/// Pushes every eligible record of every kind to the public site.
///
/// ## Errors
/// Fails only on database errors; individual push failures are counted and
/// stored on their records.
#[handler]
async fn sync_all(depot: &mut Depot) -> AppResult<Json<SyncAllResponse>> {
    let provider = get_db_from_depot(depot)?;
    let mirror = get_mirror_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let report = sweep(&mut conn, &mirror).await?;

    Ok(Json(SyncAllResponse {
        success: true,
        synced: report.synced,
        total: report.total,
        message: format!("{}/{} records synced", report.synced, report.total),
    }))
}

pub fn routes() -> Router {
    Router::with_path("sync/all").post(sync_all)
}
