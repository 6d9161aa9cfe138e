use labmath_core::types::RecordKind;
use labmath_db::db::connection::DbConnection;
use labmath_db::db::query::record;

use crate::error::ServiceResult;
use crate::mirror::{MirrorClient, SiteHealth};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KindStats {
    pub kind: RecordKind,
    pub total: i64,
    /// Published or active records; `None` for kinds without a visibility flag.
    pub visible: Option<i64>,
}

/// Overview shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DashboardStats {
    pub kinds: Vec<KindStats>,
    /// Records of any kind whose last mirror attempt failed.
    pub sync_failed: i64,
    pub site: SiteHealth,
    pub api_key_configured: bool,
}

/// ## Summary
/// Collects per-kind counts, the failed-sync count and remote reachability.
///
/// ## Errors
/// Returns a database error if any count fails.
#[tracing::instrument(skip(conn, mirror))]
pub async fn dashboard(
    conn: &mut DbConnection<'_>,
    mirror: &MirrorClient,
) -> ServiceResult<DashboardStats> {
    let mut kinds = Vec::with_capacity(RecordKind::ALL.len());
    for kind in RecordKind::ALL {
        kinds.push(KindStats {
            kind,
            total: record::count_records(conn, kind).await?,
            visible: record::count_visible(conn, kind).await?,
        });
    }

    let sync_failed = record::count_failed(conn).await?;
    let site = mirror.health().await;

    Ok(DashboardStats {
        kinds,
        sync_failed,
        site,
        api_key_configured: mirror.api_key_configured(),
    })
}
