//! Query functions for activities.

use diesel::dsl::AsSelect;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::activity;
use crate::model::activity::{Activity, ActivityChanges, NewActivity};

type BoxedQuery<'a> = activity::BoxedQuery<'a, Sqlite, AsSelect<Activity, Sqlite>>;

/// ## Summary
/// Returns a query to select all activities.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    activity::table.select(Activity::as_select()).into_boxed()
}

/// ## Summary
/// Returns a query to find an activity by ID.
#[must_use]
pub fn by_id(id: i32) -> BoxedQuery<'static> {
    all().filter(activity::id.eq(id))
}

/// ## Summary
/// Returns a query to select all activities, newest first.
#[must_use]
pub fn newest_first() -> BoxedQuery<'static> {
    all().order((activity::created_at.desc(), activity::id.desc()))
}

/// ## Summary
/// Returns a query to select published activities in ID order.
#[must_use]
pub fn published() -> BoxedQuery<'static> {
    all()
        .filter(activity::is_published.eq(true))
        .order(activity::id.asc())
}

/// ## Summary
/// Inserts a new activity and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_activity(
    conn: &mut DbConnection<'_>,
    new_activity: &NewActivity<'_>,
) -> diesel::QueryResult<Activity> {
    diesel::insert_into(activity::table)
        .values(new_activity)
        .returning(Activity::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Retrieves an activity by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_activity(
    conn: &mut DbConnection<'_>,
    id: i32,
) -> diesel::QueryResult<Option<Activity>> {
    by_id(id).get_result::<Activity>(conn).await.optional()
}

/// ## Summary
/// Lists all activities, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_activities(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Activity>> {
    newest_first().get_results::<Activity>(conn).await
}

/// ## Summary
/// Lists the activities that belong on the remote site.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_published(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Activity>> {
    published().get_results::<Activity>(conn).await
}

/// ## Summary
/// Applies `changes` to an activity and returns the updated record, or `None`
/// if no activity has that ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_activity(
    conn: &mut DbConnection<'_>,
    id: i32,
    changes: &ActivityChanges<'_>,
) -> diesel::QueryResult<Option<Activity>> {
    diesel::update(activity::table.filter(activity::id.eq(id)))
        .set(changes)
        .returning(Activity::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes an activity, returning the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_activity(conn: &mut DbConnection<'_>, id: i32) -> diesel::QueryResult<usize> {
    diesel::delete(activity::table.filter(activity::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Counts all activities.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_activities(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    activity::table.count().get_result(conn).await
}

/// ## Summary
/// Counts published activities.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_published(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    activity::table
        .filter(activity::is_published.eq(true))
        .count()
        .get_result(conn)
        .await
}
