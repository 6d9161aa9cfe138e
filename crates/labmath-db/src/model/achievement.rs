use diesel::{prelude::*, sqlite::Sqlite};

use crate::db::{enums::SyncStatus, schema};

/// A completed project or distinction. Achievements have no visibility flag.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = schema::achievement)]
#[diesel(check_for_backend(Sqlite))]
pub struct Achievement {
    pub id: i32,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "categorie")]
    pub category: Option<String>,
    #[serde(rename = "date_realisation")]
    pub achieved_on: Option<chrono::NaiveDate>,
    #[serde(rename = "date_creation")]
    pub created_at: chrono::NaiveDateTime,
    pub last_sync: Option<chrono::NaiveDateTime>,
    pub sync_status: SyncStatus,
    pub sync_message: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::achievement)]
pub struct NewAchievement<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub achieved_on: Option<chrono::NaiveDate>,
    pub created_at: chrono::NaiveDateTime,
    pub sync_status: SyncStatus,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::achievement)]
#[diesel(treat_none_as_null = true)]
pub struct AchievementChanges<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub achieved_on: Option<chrono::NaiveDate>,
    pub sync_status: SyncStatus,
}
