//! Kind-dispatching queries over [`ContentRecord`].

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use labmath_core::types::RecordKind;

use crate::db::connection::DbConnection;
use crate::db::enums::SyncStatus;
use crate::db::query::{achievement, activity, announcement, offer};
use crate::db::schema;
use crate::model::record::ContentRecord;

fn wrap_all<T: Into<ContentRecord>>(records: Vec<T>) -> Vec<ContentRecord> {
    records.into_iter().map(Into::into).collect()
}

/// ## Summary
/// Retrieves a record of `kind` by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_record(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
    id: i32,
) -> diesel::QueryResult<Option<ContentRecord>> {
    Ok(match kind {
        RecordKind::Activity => activity::get_activity(conn, id).await?.map(Into::into),
        RecordKind::Achievement => achievement::get_achievement(conn, id).await?.map(Into::into),
        RecordKind::Announcement => announcement::get_announcement(conn, id)
            .await?
            .map(Into::into),
        RecordKind::Offer => offer::get_offer(conn, id).await?.map(Into::into),
    })
}

/// ## Summary
/// Lists every record of `kind`, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_records(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
) -> diesel::QueryResult<Vec<ContentRecord>> {
    Ok(match kind {
        RecordKind::Activity => wrap_all(activity::list_activities(conn).await?),
        RecordKind::Achievement => wrap_all(achievement::list_achievements(conn).await?),
        RecordKind::Announcement => wrap_all(announcement::list_announcements(conn).await?),
        RecordKind::Offer => wrap_all(offer::list_offers(conn).await?),
    })
}

/// ## Summary
/// Lists the records of `kind` that belong on the remote site: those whose
/// visibility flag is set, or every achievement.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_eligible(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
) -> diesel::QueryResult<Vec<ContentRecord>> {
    Ok(match kind {
        RecordKind::Activity => wrap_all(activity::list_published(conn).await?),
        RecordKind::Achievement => wrap_all(achievement::list_eligible(conn).await?),
        RecordKind::Announcement => wrap_all(announcement::list_active(conn).await?),
        RecordKind::Offer => wrap_all(offer::list_active(conn).await?),
    })
}

/// ## Summary
/// Deletes a record of `kind`, returning the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_record(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
    id: i32,
) -> diesel::QueryResult<usize> {
    match kind {
        RecordKind::Activity => activity::delete_activity(conn, id).await,
        RecordKind::Achievement => achievement::delete_achievement(conn, id).await,
        RecordKind::Announcement => announcement::delete_announcement(conn, id).await,
        RecordKind::Offer => offer::delete_offer(conn, id).await,
    }
}

/// ## Summary
/// Counts every record of `kind`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_records(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
) -> diesel::QueryResult<i64> {
    match kind {
        RecordKind::Activity => activity::count_activities(conn).await,
        RecordKind::Achievement => achievement::count_achievements(conn).await,
        RecordKind::Announcement => announcement::count_announcements(conn).await,
        RecordKind::Offer => offer::count_offers(conn).await,
    }
}

/// ## Summary
/// Counts the records of `kind` whose visibility flag is set. Returns `None`
/// for kinds without a flag.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_visible(
    conn: &mut DbConnection<'_>,
    kind: RecordKind,
) -> diesel::QueryResult<Option<i64>> {
    Ok(match kind {
        RecordKind::Activity => Some(activity::count_published(conn).await?),
        RecordKind::Achievement => None,
        RecordKind::Announcement => Some(announcement::count_active(conn).await?),
        RecordKind::Offer => Some(offer::count_active(conn).await?),
    })
}

/// ## Summary
/// Counts records of every kind whose last mirror attempt failed.
///
/// ## Errors
/// Returns a database error if any query fails.
pub async fn count_failed(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    let failed = SyncStatus::Failed;

    let activities: i64 = schema::activity::table
        .filter(schema::activity::sync_status.eq(failed))
        .count()
        .get_result(conn)
        .await?;
    let achievements: i64 = schema::achievement::table
        .filter(schema::achievement::sync_status.eq(failed))
        .count()
        .get_result(conn)
        .await?;
    let announcements: i64 = schema::announcement::table
        .filter(schema::announcement::sync_status.eq(failed))
        .count()
        .get_result(conn)
        .await?;
    let offers: i64 = schema::offer::table
        .filter(schema::offer::sync_status.eq(failed))
        .count()
        .get_result(conn)
        .await?;

    Ok(activities + achievements + announcements + offers)
}
