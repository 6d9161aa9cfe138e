//! Query functions for achievements.

use diesel::dsl::AsSelect;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::achievement;
use crate::model::achievement::{Achievement, AchievementChanges, NewAchievement};

type BoxedQuery<'a> = achievement::BoxedQuery<'a, Sqlite, AsSelect<Achievement, Sqlite>>;

/// ## Summary
/// Returns a query to select all achievements.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    achievement::table
        .select(Achievement::as_select())
        .into_boxed()
}

/// ## Summary
/// Returns a query to find an achievement by ID.
#[must_use]
pub fn by_id(id: i32) -> BoxedQuery<'static> {
    all().filter(achievement::id.eq(id))
}

/// ## Summary
/// Returns a query to select all achievements, newest first.
#[must_use]
pub fn newest_first() -> BoxedQuery<'static> {
    all().order((achievement::created_at.desc(), achievement::id.desc()))
}

/// ## Summary
/// Inserts a new achievement and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_achievement(
    conn: &mut DbConnection<'_>,
    new_achievement: &NewAchievement<'_>,
) -> diesel::QueryResult<Achievement> {
    diesel::insert_into(achievement::table)
        .values(new_achievement)
        .returning(Achievement::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Retrieves an achievement by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_achievement(
    conn: &mut DbConnection<'_>,
    id: i32,
) -> diesel::QueryResult<Option<Achievement>> {
    by_id(id).get_result::<Achievement>(conn).await.optional()
}

/// ## Summary
/// Lists all achievements, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_achievements(
    conn: &mut DbConnection<'_>,
) -> diesel::QueryResult<Vec<Achievement>> {
    newest_first().get_results::<Achievement>(conn).await
}

/// ## Summary
/// Lists every achievement in ID order. Achievements carry no visibility
/// flag, so all of them belong on the remote site.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_eligible(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Achievement>> {
    all()
        .order(achievement::id.asc())
        .get_results::<Achievement>(conn)
        .await
}

/// ## Summary
/// Applies `changes` to an achievement and returns the updated record, or
/// `None` if no achievement has that ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_achievement(
    conn: &mut DbConnection<'_>,
    id: i32,
    changes: &AchievementChanges<'_>,
) -> diesel::QueryResult<Option<Achievement>> {
    diesel::update(achievement::table.filter(achievement::id.eq(id)))
        .set(changes)
        .returning(Achievement::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes an achievement, returning the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_achievement(
    conn: &mut DbConnection<'_>,
    id: i32,
) -> diesel::QueryResult<usize> {
    diesel::delete(achievement::table.filter(achievement::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Counts all achievements.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_achievements(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    achievement::table.count().get_result(conn).await
}
