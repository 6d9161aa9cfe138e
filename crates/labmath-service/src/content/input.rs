//! Request bodies for creating and editing records.
//!
//! Field names are the persisted names used throughout the admin API.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use labmath_core::types::RecordKind;
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_ANNOUNCEMENT_TYPE: &str = "info";
pub const DEFAULT_OFFER_TYPE: &str = "autre";

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityInput {
    pub titre: String,
    pub description: Option<String>,
    pub contenu: Option<String>,
    pub image_url: Option<String>,
    pub est_publie: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AchievementInput {
    pub titre: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categorie: Option<String>,
    pub date_realisation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementInput {
    pub titre: String,
    pub contenu: Option<String>,
    pub type_annonce: Option<String>,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    pub est_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferInput {
    pub titre: String,
    pub description: Option<String>,
    pub type_offre: Option<String>,
    pub lieu: Option<String>,
    pub date_limite: Option<String>,
    pub est_active: Option<bool>,
}

/// A validated create or edit request for one record kind.
#[derive(Debug, Clone)]
pub enum RecordInput {
    Activity(ActivityInput),
    Achievement(AchievementInput),
    Announcement(AnnouncementInput),
    Offer(OfferInput),
}

impl RecordInput {
    /// ## Summary
    /// Decodes a JSON body as the input type of `kind` and checks that the
    /// title is present.
    ///
    /// ## Errors
    /// Returns `ValidationError` if the body does not match the kind's fields
    /// or the title is blank.
    pub fn from_json(kind: RecordKind, body: serde_json::Value) -> ServiceResult<Self> {
        let input = match kind {
            RecordKind::Activity => Self::Activity(decode(body)?),
            RecordKind::Achievement => Self::Achievement(decode(body)?),
            RecordKind::Announcement => Self::Announcement(decode(body)?),
            RecordKind::Offer => Self::Offer(decode(body)?),
        };

        if input.title().trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "titre must not be empty".to_string(),
            ));
        }

        Ok(input)
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Activity(_) => RecordKind::Activity,
            Self::Achievement(_) => RecordKind::Achievement,
            Self::Announcement(_) => RecordKind::Announcement,
            Self::Offer(_) => RecordKind::Offer,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Activity(i) => &i.titre,
            Self::Achievement(i) => &i.titre,
            Self::Announcement(i) => &i.titre,
            Self::Offer(i) => &i.titre,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> ServiceResult<T> {
    serde_json::from_value(body).map_err(|e| ServiceError::ValidationError(e.to_string()))
}

/// Treats a missing, empty or blank string as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// ## Summary
/// Parses an optional `YYYY-MM-DD` date.
///
/// ## Errors
/// Returns `ValidationError` naming `field` if the value is not a valid date.
pub fn parse_date(field: &str, value: Option<&str>) -> ServiceResult<Option<NaiveDate>> {
    non_blank(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                ServiceError::ValidationError(format!("{field}: invalid date '{raw}': {e}"))
            })
        })
        .transpose()
}

/// ## Summary
/// Parses an optional timestamp given either as RFC 3339 (normalised to UTC)
/// or as a naive ISO-8601 date-time.
///
/// ## Errors
/// Returns `ValidationError` naming `field` if no accepted format matches.
pub fn parse_timestamp(field: &str, value: Option<&str>) -> ServiceResult<Option<NaiveDateTime>> {
    let Some(raw) = non_blank(value).map(str::trim) else {
        return Ok(None);
    };

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(with_offset.naive_utc()));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(Some)
        .ok_or_else(|| ServiceError::ValidationError(format!("{field}: invalid timestamp '{raw}'")))
}

impl AchievementInput {
    /// ## Errors
    /// Returns `ValidationError` if `date_realisation` is malformed.
    pub fn achieved_on(&self) -> ServiceResult<Option<NaiveDate>> {
        parse_date("date_realisation", self.date_realisation.as_deref())
    }
}

impl AnnouncementInput {
    /// ## Errors
    /// Returns `ValidationError` if `date_debut` is malformed.
    pub fn starts_at(&self) -> ServiceResult<Option<NaiveDateTime>> {
        parse_timestamp("date_debut", self.date_debut.as_deref())
    }

    /// ## Errors
    /// Returns `ValidationError` if `date_fin` is malformed.
    pub fn ends_at(&self) -> ServiceResult<Option<NaiveDateTime>> {
        parse_timestamp("date_fin", self.date_fin.as_deref())
    }

    #[must_use]
    pub fn announcement_type(&self) -> &str {
        non_blank(self.type_annonce.as_deref()).unwrap_or(DEFAULT_ANNOUNCEMENT_TYPE)
    }
}

impl OfferInput {
    /// ## Errors
    /// Returns `ValidationError` if `date_limite` is malformed.
    pub fn deadline(&self) -> ServiceResult<Option<NaiveDate>> {
        parse_date("date_limite", self.date_limite.as_deref())
    }

    #[must_use]
    pub fn offer_type(&self) -> &str {
        non_blank(self.type_offre.as_deref()).unwrap_or(DEFAULT_OFFER_TYPE)
    }
}
