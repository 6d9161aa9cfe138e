//! Query functions for announcements.

use diesel::dsl::AsSelect;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::announcement;
use crate::model::announcement::{Announcement, AnnouncementChanges, NewAnnouncement};

type BoxedQuery<'a> = announcement::BoxedQuery<'a, Sqlite, AsSelect<Announcement, Sqlite>>;

/// ## Summary
/// Returns a query to select all announcements.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    announcement::table
        .select(Announcement::as_select())
        .into_boxed()
}

/// ## Summary
/// Returns a query to find an announcement by ID.
#[must_use]
pub fn by_id(id: i32) -> BoxedQuery<'static> {
    all().filter(announcement::id.eq(id))
}

/// ## Summary
/// Returns a query to select all announcements, newest first.
#[must_use]
pub fn newest_first() -> BoxedQuery<'static> {
    all().order((announcement::created_at.desc(), announcement::id.desc()))
}

/// ## Summary
/// Returns a query to select active announcements in ID order.
#[must_use]
pub fn active() -> BoxedQuery<'static> {
    all()
        .filter(announcement::is_active.eq(true))
        .order(announcement::id.asc())
}

/// ## Summary
/// Inserts a new announcement and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_announcement(
    conn: &mut DbConnection<'_>,
    new_announcement: &NewAnnouncement<'_>,
) -> diesel::QueryResult<Announcement> {
    diesel::insert_into(announcement::table)
        .values(new_announcement)
        .returning(Announcement::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Retrieves an announcement by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_announcement(
    conn: &mut DbConnection<'_>,
    id: i32,
) -> diesel::QueryResult<Option<Announcement>> {
    by_id(id).get_result::<Announcement>(conn).await.optional()
}

/// ## Summary
/// Lists all announcements, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_announcements(
    conn: &mut DbConnection<'_>,
) -> diesel::QueryResult<Vec<Announcement>> {
    newest_first().get_results::<Announcement>(conn).await
}

/// ## Summary
/// Lists the announcements that belong on the remote site.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_active(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Announcement>> {
    active().get_results::<Announcement>(conn).await
}

/// ## Summary
/// Applies `changes` to an announcement and returns the updated record, or
/// `None` if no announcement has that ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_announcement(
    conn: &mut DbConnection<'_>,
    id: i32,
    changes: &AnnouncementChanges<'_>,
) -> diesel::QueryResult<Option<Announcement>> {
    diesel::update(announcement::table.filter(announcement::id.eq(id)))
        .set(changes)
        .returning(Announcement::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes an announcement, returning the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_announcement(
    conn: &mut DbConnection<'_>,
    id: i32,
) -> diesel::QueryResult<usize> {
    diesel::delete(announcement::table.filter(announcement::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Counts all announcements.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_announcements(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    announcement::table.count().get_result(conn).await
}

/// ## Summary
/// Counts active announcements.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_active(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    announcement::table
        .filter(announcement::is_active.eq(true))
        .count()
        .get_result(conn)
        .await
}
