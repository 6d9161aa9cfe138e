use labmath_core::types::RecordKind;
use labmath_db::db::connection::DbConnection;
use labmath_db::db::query::record::list_eligible;

use crate::error::ServiceResult;
use crate::mirror::MirrorClient;
use crate::sync::tracker::push_and_record;

/// Aggregate result of a full sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct SweepReport {
    /// Records whose mirror POST succeeded.
    pub synced: usize,
    /// Records eligible for mirroring across every kind.
    pub total: usize,
}

/// ## Summary
/// Pushes every eligible record to the remote site, one at a time, kind by
/// kind in the order activities, achievements, announcements, offers.
///
/// Eligible means visible; achievements are always eligible.
///
/// ## Side Effects
/// Stores the outcome of each attempted push on its record.
///
/// ## Errors
/// Returns a database error if listing records or storing an outcome fails.
#[tracing::instrument(skip(conn, mirror))]
pub async fn sync_all(
    conn: &mut DbConnection<'_>,
    mirror: &MirrorClient,
) -> ServiceResult<SweepReport> {
    let mut report = SweepReport::default();

    for kind in RecordKind::ALL {
        let records = list_eligible(conn, kind).await?;
        tracing::debug!(%kind, count = records.len(), "Syncing eligible records");
        report.total += records.len();

        for record in &records {
            if push_and_record(conn, mirror, record).await?.ok {
                report.synced += 1;
            }
        }
    }

    tracing::info!(synced = report.synced, total = report.total, "Full sync finished");

    Ok(report)
}
