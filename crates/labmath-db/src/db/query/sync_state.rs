//! Writes of the per-record mirror bookkeeping columns.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use labmath_core::types::RecordKind;

use crate::db::connection::DbConnection;
use crate::db::enums::SyncStatus;
use crate::db::schema;

/// Result of one attempted mirror call, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncUpdate<'a> {
    /// The remote accepted the record at `at`; any previous message is cleared.
    Succeeded { at: NaiveDateTime },
    /// The call failed; `message` replaces any previous message.
    Failed { message: &'a str },
}

macro_rules! apply_sync_update {
    ($table:ident, $conn:expr, $id:expr, $update:expr) => {{
        let target = diesel::update(schema::$table::table.filter(schema::$table::id.eq($id)));
        match $update {
            SyncUpdate::Succeeded { at } => {
                target
                    .set((
                        schema::$table::sync_status.eq(SyncStatus::Success),
                        schema::$table::last_sync.eq(Some(at)),
                        schema::$table::sync_message.eq(None::<&str>),
                    ))
                    .execute($conn)
                    .await
            }
            SyncUpdate::Failed { message } => {
                target
                    .set((
                        schema::$table::sync_status.eq(SyncStatus::Failed),
                        schema::$table::sync_message.eq(Some(message)),
                    ))
                    .execute($conn)
                    .await
            }
        }
    }};
}

/// ## Summary
/// Persists the outcome of a mirror attempt on a record of `kind`.
///
/// Returns the number of rows written, which is zero if the record no longer
/// exists.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn record_sync_update(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
    id: i32,
    update: SyncUpdate<'_>,
) -> diesel::QueryResult<usize> {
    match kind {
        RecordKind::Activity => apply_sync_update!(activity, conn, id, update),
        RecordKind::Achievement => apply_sync_update!(achievement, conn, id, update),
        RecordKind::Announcement => apply_sync_update!(announcement, conn, id, update),
        RecordKind::Offer => apply_sync_update!(offer, conn, id, update),
    }
}
