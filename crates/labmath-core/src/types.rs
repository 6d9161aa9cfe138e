use std::str::FromStr;

use crate::error::CoreError;

/// The closed set of content record kinds managed by the admin backend.
///
/// Each kind maps to one table locally and to one collection on the remote site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RecordKind {
    #[serde(rename = "activite")]
    Activity,
    #[serde(rename = "realisation")]
    Achievement,
    #[serde(rename = "annonce")]
    Announcement,
    #[serde(rename = "offre")]
    Offer,
}

impl RecordKind {
    /// All kinds, in the order a full sweep visits them.
    pub const ALL: [Self; 4] = [
        Self::Activity,
        Self::Achievement,
        Self::Announcement,
        Self::Offer,
    ];

    /// ## Summary
    /// Returns the slug used for this kind in control-surface paths and remote URLs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Activity => "activite",
            Self::Achievement => "realisation",
            Self::Announcement => "annonce",
            Self::Offer => "offre",
        }
    }

    /// ## Summary
    /// Returns the remote collection segment, e.g. `activites` in `/api/activites/{id}`.
    #[must_use]
    pub const fn remote_collection(self) -> &'static str {
        match self {
            Self::Activity => "activites",
            Self::Achievement => "realisations",
            Self::Announcement => "annonces",
            Self::Offer => "offres",
        }
    }

    /// ## Summary
    /// Message reported when a visible record of this kind is hidden by an update.
    #[must_use]
    pub const fn hidden_message(self) -> &'static str {
        match self {
            Self::Activity => "Unpublished",
            Self::Achievement | Self::Announcement | Self::Offer => "Deactivated",
        }
    }
}

impl FromStr for RecordKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| CoreError::UnknownRecordKind(s.to_string()))
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
