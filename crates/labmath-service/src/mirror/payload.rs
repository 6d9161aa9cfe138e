//! Canonical JSON bodies sent to the remote site.
//!
//! Field names are the persisted names the remote API expects. Absent optional
//! values serialize as `null`, dates and timestamps as ISO-8601 strings, and the
//! record ID as a string.

use chrono::{NaiveDate, NaiveDateTime};
use labmath_db::model::{
    achievement::Achievement, activity::Activity, announcement::Announcement, offer::Offer,
    record::ContentRecord,
};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn iso_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn iso_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPayload<'a> {
    pub id: String,
    pub titre: &'a str,
    pub description: Option<&'a str>,
    pub contenu: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub auteur: Option<&'a str>,
    pub est_publie: bool,
    pub date_creation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementPayload<'a> {
    pub id: String,
    pub titre: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub categorie: Option<&'a str>,
    pub date_realisation: Option<String>,
    pub date_creation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnouncementPayload<'a> {
    pub id: String,
    pub titre: &'a str,
    pub contenu: Option<&'a str>,
    pub type_annonce: Option<&'a str>,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    pub est_active: bool,
    pub date_creation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferPayload<'a> {
    pub id: String,
    pub titre: &'a str,
    pub description: Option<&'a str>,
    pub type_offre: Option<&'a str>,
    pub lieu: Option<&'a str>,
    pub date_limite: Option<String>,
    pub est_active: bool,
    pub date_creation: String,
}

/// The body of a mirror POST for any record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordPayload<'a> {
    Activity(ActivityPayload<'a>),
    Achievement(AchievementPayload<'a>),
    Announcement(AnnouncementPayload<'a>),
    Offer(OfferPayload<'a>),
}

impl<'a> From<&'a Activity> for ActivityPayload<'a> {
    fn from(record: &'a Activity) -> Self {
        Self {
            id: record.id.to_string(),
            titre: &record.title,
            description: record.description.as_deref(),
            contenu: record.content.as_deref(),
            image_url: record.image_url.as_deref(),
            auteur: record.author.as_deref(),
            est_publie: record.is_published,
            date_creation: iso_timestamp(record.created_at),
        }
    }
}

impl<'a> From<&'a Achievement> for AchievementPayload<'a> {
    fn from(record: &'a Achievement) -> Self {
        Self {
            id: record.id.to_string(),
            titre: &record.title,
            description: record.description.as_deref(),
            image_url: record.image_url.as_deref(),
            categorie: record.category.as_deref(),
            date_realisation: record.achieved_on.map(iso_date),
            date_creation: iso_timestamp(record.created_at),
        }
    }
}

impl<'a> From<&'a Announcement> for AnnouncementPayload<'a> {
    fn from(record: &'a Announcement) -> Self {
        Self {
            id: record.id.to_string(),
            titre: &record.title,
            contenu: record.content.as_deref(),
            type_annonce: record.announcement_type.as_deref(),
            date_debut: record.starts_at.map(iso_timestamp),
            date_fin: record.ends_at.map(iso_timestamp),
            est_active: record.is_active,
            date_creation: iso_timestamp(record.created_at),
        }
    }
}

impl<'a> From<&'a Offer> for OfferPayload<'a> {
    fn from(record: &'a Offer) -> Self {
        Self {
            id: record.id.to_string(),
            titre: &record.title,
            description: record.description.as_deref(),
            type_offre: record.offer_type.as_deref(),
            lieu: record.location.as_deref(),
            date_limite: record.deadline.map(iso_date),
            est_active: record.is_active,
            date_creation: iso_timestamp(record.created_at),
        }
    }
}

impl<'a> From<&'a ContentRecord> for RecordPayload<'a> {
    fn from(record: &'a ContentRecord) -> Self {
        match record {
            ContentRecord::Activity(r) => Self::Activity(r.into()),
            ContentRecord::Achievement(r) => Self::Achievement(r.into()),
            ContentRecord::Announcement(r) => Self::Announcement(r.into()),
            ContentRecord::Offer(r) => Self::Offer(r.into()),
        }
    }
}
