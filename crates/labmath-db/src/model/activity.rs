use diesel::{prelude::*, sqlite::Sqlite};

use crate::db::{enums::SyncStatus, schema};

/// A news item or event write-up, mirrored while `is_published` is set.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = schema::activity)]
#[diesel(check_for_backend(Sqlite))]
pub struct Activity {
    pub id: i32,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "contenu")]
    pub content: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "auteur")]
    pub author: Option<String>,
    #[serde(rename = "date_creation")]
    pub created_at: chrono::NaiveDateTime,
    #[serde(rename = "est_publie")]
    pub is_published: bool,
    pub last_sync: Option<chrono::NaiveDateTime>,
    pub sync_status: SyncStatus,
    pub sync_message: Option<String>,
}

/// Insert struct for creating new activities
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::activity)]
pub struct NewActivity<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub content: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub author: Option<&'a str>,
    pub created_at: chrono::NaiveDateTime,
    pub is_published: bool,
    pub sync_status: SyncStatus,
}

/// Editable fields of an activity. Absent values clear the column, and the
/// sync status is reset along with the edit.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::activity)]
#[diesel(treat_none_as_null = true)]
pub struct ActivityChanges<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub content: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub is_published: bool,
    pub sync_status: SyncStatus,
}
