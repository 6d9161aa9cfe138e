use diesel::{prelude::*, sqlite::Sqlite};

use crate::db::{enums::SyncStatus, schema};

/// A job, internship or partnership offer, mirrored while `is_active` is set.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = schema::offer)]
#[diesel(check_for_backend(Sqlite))]
pub struct Offer {
    pub id: i32,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type_offre")]
    pub offer_type: Option<String>,
    #[serde(rename = "lieu")]
    pub location: Option<String>,
    #[serde(rename = "date_limite")]
    pub deadline: Option<chrono::NaiveDate>,
    #[serde(rename = "date_creation")]
    pub created_at: chrono::NaiveDateTime,
    #[serde(rename = "est_active")]
    pub is_active: bool,
    pub last_sync: Option<chrono::NaiveDateTime>,
    pub sync_status: SyncStatus,
    pub sync_message: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::offer)]
pub struct NewOffer<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub offer_type: Option<&'a str>,
    pub location: Option<&'a str>,
    pub deadline: Option<chrono::NaiveDate>,
    pub created_at: chrono::NaiveDateTime,
    pub is_active: bool,
    pub sync_status: SyncStatus,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::offer)]
#[diesel(treat_none_as_null = true)]
pub struct OfferChanges<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub offer_type: Option<&'a str>,
    pub location: Option<&'a str>,
    pub deadline: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub sync_status: SyncStatus,
}
