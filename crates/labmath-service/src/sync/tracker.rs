use labmath_core::constants::MAX_SYNC_MESSAGE_CHARS;
use labmath_core::types::RecordKind;
use labmath_core::util::text::truncate_chars;
use labmath_db::db::connection::DbConnection;
use labmath_db::db::query::sync_state::{SyncUpdate, record_sync_update};
use labmath_db::model::record::ContentRecord;

use crate::error::ServiceResult;
use crate::mirror::{MirrorClient, MirrorOutcome};

/// ## Summary
/// Persists the outcome of an attempted mirror POST on the record's sync fields.
///
/// Outcomes that were refused before any network call leave the fields as
/// they are.
///
/// ## Side Effects
/// - On success: `sync_status = success`, `last_sync = now`, message cleared
/// - On failure: `sync_status = failed`, message set (at most 100 characters)
///
/// ## Errors
/// Returns a database error if the update fails.
#[tracing::instrument(skip(conn, outcome), fields(ok = outcome.ok, attempted = outcome.attempted))]
pub async fn record_outcome(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
    id: i32,
    outcome: &MirrorOutcome,
) -> ServiceResult<()> {
    if !outcome.attempted {
        tracing::trace!("Outcome was not an attempt, sync fields untouched");
        return Ok(());
    }

    let message = truncate_chars(&outcome.message, MAX_SYNC_MESSAGE_CHARS);
    let update = if outcome.ok {
        SyncUpdate::Succeeded {
            at: chrono::Utc::now().naive_utc(),
        }
    } else {
        SyncUpdate::Failed { message: &message }
    };

    let written = record_sync_update(conn, kind, id, update).await?;
    if written == 0 {
        tracing::warn!("Record disappeared before its sync outcome was stored");
    }

    Ok(())
}

/// ## Summary
/// Mirrors `record` and stores the outcome.
///
/// ## Errors
/// Returns a database error if storing the outcome fails. Remote failures are
/// part of the returned outcome, never an error.
pub async fn push_and_record(
    conn: &mut DbConnection<'_>,
    mirror: &MirrorClient,
    record: &ContentRecord,
) -> ServiceResult<MirrorOutcome> {
    let outcome = mirror.push(record).await;
    record_outcome(conn, record.kind(), record.id(), &outcome).await?;
    Ok(outcome)
}
