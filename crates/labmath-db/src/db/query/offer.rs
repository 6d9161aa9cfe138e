//! Query functions for offers.

use diesel::dsl::AsSelect;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::offer;
use crate::model::offer::{NewOffer, Offer, OfferChanges};

type BoxedQuery<'a> = offer::BoxedQuery<'a, Sqlite, AsSelect<Offer, Sqlite>>;

/// ## Summary
/// Returns a query to select all offers.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    offer::table.select(Offer::as_select()).into_boxed()
}

/// ## Summary
/// Returns a query to find an offer by ID.
#[must_use]
pub fn by_id(id: i32) -> BoxedQuery<'static> {
    all().filter(offer::id.eq(id))
}

/// ## Summary
/// Returns a query to select all offers, newest first.
#[must_use]
pub fn newest_first() -> BoxedQuery<'static> {
    all().order((offer::created_at.desc(), offer::id.desc()))
}

/// ## Summary
/// Returns a query to select active offers in ID order.
#[must_use]
pub fn active() -> BoxedQuery<'static> {
    all()
        .filter(offer::is_active.eq(true))
        .order(offer::id.asc())
}

/// ## Summary
/// Inserts a new offer and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_offer(
    conn: &mut DbConnection<'_>,
    new_offer: &NewOffer<'_>,
) -> diesel::QueryResult<Offer> {
    diesel::insert_into(offer::table)
        .values(new_offer)
        .returning(Offer::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Retrieves an offer by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_offer(conn: &mut DbConnection<'_>, id: i32) -> diesel::QueryResult<Option<Offer>> {
    by_id(id).get_result::<Offer>(conn).await.optional()
}

/// ## Summary
/// Lists all offers, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_offers(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Offer>> {
    newest_first().get_results::<Offer>(conn).await
}

/// ## Summary
/// Lists the offers that belong on the remote site.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_active(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<Offer>> {
    active().get_results::<Offer>(conn).await
}

/// ## Summary
/// Applies `changes` to an offer and returns the updated record, or
/// `None` if no offer has that ID.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_offer(
    conn: &mut DbConnection<'_>,
    id: i32,
    changes: &OfferChanges<'_>,
) -> diesel::QueryResult<Option<Offer>> {
    diesel::update(offer::table.filter(offer::id.eq(id)))
        .set(changes)
        .returning(Offer::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes an offer, returning the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_offer(conn: &mut DbConnection<'_>, id: i32) -> diesel::QueryResult<usize> {
    diesel::delete(offer::table.filter(offer::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Counts all offers.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_offers(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    offer::table.count().get_result(conn).await
}

/// ## Summary
/// Counts active offers.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_active(conn: &mut DbConnection<'_>) -> diesel::QueryResult<i64> {
    offer::table
        .filter(offer::is_active.eq(true))
        .count()
        .get_result(conn)
        .await
}
