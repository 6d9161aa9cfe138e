use diesel::{prelude::*, sqlite::Sqlite};

use crate::db::{enums::SyncStatus, schema};

/// A time-bounded notice, mirrored while `is_active` is set.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = schema::announcement)]
#[diesel(check_for_backend(Sqlite))]
pub struct Announcement {
    pub id: i32,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "contenu")]
    pub content: Option<String>,
    #[serde(rename = "type_annonce")]
    pub announcement_type: Option<String>,
    #[serde(rename = "date_debut")]
    pub starts_at: Option<chrono::NaiveDateTime>,
    #[serde(rename = "date_fin")]
    pub ends_at: Option<chrono::NaiveDateTime>,
    #[serde(rename = "date_creation")]
    pub created_at: chrono::NaiveDateTime,
    #[serde(rename = "est_active")]
    pub is_active: bool,
    pub last_sync: Option<chrono::NaiveDateTime>,
    pub sync_status: SyncStatus,
    pub sync_message: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::announcement)]
pub struct NewAnnouncement<'a> {
    pub title: &'a str,
    pub content: Option<&'a str>,
    pub announcement_type: Option<&'a str>,
    pub starts_at: Option<chrono::NaiveDateTime>,
    pub ends_at: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
    pub is_active: bool,
    pub sync_status: SyncStatus,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::announcement)]
#[diesel(treat_none_as_null = true)]
pub struct AnnouncementChanges<'a> {
    pub title: &'a str,
    pub content: Option<&'a str>,
    pub announcement_type: Option<&'a str>,
    pub starts_at: Option<chrono::NaiveDateTime>,
    pub ends_at: Option<chrono::NaiveDateTime>,
    pub is_active: bool,
    pub sync_status: SyncStatus,
}
