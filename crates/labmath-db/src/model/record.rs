use chrono::NaiveDateTime;
use labmath_core::types::RecordKind;

use crate::db::enums::SyncStatus;
use crate::model::{
    achievement::Achievement, activity::Activity, announcement::Announcement, offer::Offer,
};

/// A loaded content record of any kind.
///
/// Mirroring, status tracking and the full sweep operate on this type so they
/// are written once rather than per table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ContentRecord {
    Activity(Activity),
    Achievement(Achievement),
    Announcement(Announcement),
    Offer(Offer),
}

impl ContentRecord {
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
    pub const fn id(&self) -> i32 {
        match self {
            Self::Activity(r) => r.id,
            Self::Achievement(r) => r.id,
            Self::Announcement(r) => r.id,
            Self::Offer(r) => r.id,
        }
    }

    /// ## Summary
    /// Whether the record should currently be present on the remote site.
    ///
    /// Achievements have no visibility flag and are always visible.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        match self {
            Self::Activity(r) => r.is_published,
            Self::Achievement(_) => true,
            Self::Announcement(r) => r.is_active,
            Self::Offer(r) => r.is_active,
        }
    }

    #[must_use]
    pub const fn sync_status(&self) -> SyncStatus {
        match self {
            Self::Activity(r) => r.sync_status,
            Self::Achievement(r) => r.sync_status,
            Self::Announcement(r) => r.sync_status,
            Self::Offer(r) => r.sync_status,
        }
    }

    #[must_use]
    pub const fn last_sync(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Activity(r) => r.last_sync,
            Self::Achievement(r) => r.last_sync,
            Self::Announcement(r) => r.last_sync,
            Self::Offer(r) => r.last_sync,
        }
    }

    #[must_use]
    pub fn sync_message(&self) -> Option<&str> {
        match self {
            Self::Activity(r) => r.sync_message.as_deref(),
            Self::Achievement(r) => r.sync_message.as_deref(),
            Self::Announcement(r) => r.sync_message.as_deref(),
            Self::Offer(r) => r.sync_message.as_deref(),
        }
    }
}

impl From<Activity> for ContentRecord {
    fn from(record: Activity) -> Self {
        Self::Activity(record)
    }
}

impl From<Achievement> for ContentRecord {
    fn from(record: Achievement) -> Self {
        Self::Achievement(record)
    }
}

impl From<Announcement> for ContentRecord {
    fn from(record: Announcement) -> Self {
        Self::Announcement(record)
    }
}

impl From<Offer> for ContentRecord {
    fn from(record: Offer) -> Self {
        Self::Offer(record)
    }
}
