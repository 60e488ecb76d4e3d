use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Disclosure level chosen by the person filing a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterType {
    #[default]
    Anonymous,
    Pseudonymous,
    /// Requires an active Aadhaar verification on the client.
    Verified,
}

impl ReporterType {
    pub const ALL: [ReporterType; 3] = [Self::Anonymous, Self::Pseudonymous, Self::Verified];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Pseudonymous => "pseudonymous",
            Self::Verified => "verified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    #[serde(rename = "In Review")]
    InReview,
    Resolved,
}

impl ComplaintStatus {
    /// Lifecycle order, as shown on the tracking timeline.
    pub const ALL: [ComplaintStatus; 3] = [Self::Pending, Self::InReview, Self::Resolved];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InReview => "In Review",
            Self::Resolved => "Resolved",
        }
    }

    /// Position of this status in the Pending → In Review → Resolved progression.
    pub fn step_index(&self) -> usize {
        match self {
            Self::Pending => 0,
            Self::InReview => 1,
            Self::Resolved => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Error returned when a string does not name a variant of one of the
/// complaint enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {}: '{}' (expected one of: {})",
            self.field,
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! str_enum {
    ($ty:ty, $field:literal, [$($variant:expr),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                const ALLOWED: &[&str] = &[$($variant.as_str()),+];
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                        allowed: ALLOWED,
                    })
            }
        }
    };
}

str_enum!(ReporterType, "reporterType", [
    ReporterType::Anonymous,
    ReporterType::Pseudonymous,
    ReporterType::Verified
]);
str_enum!(ComplaintStatus, "status", [
    ComplaintStatus::Pending,
    ComplaintStatus::InReview,
    ComplaintStatus::Resolved
]);
str_enum!(Priority, "priority", [Priority::Low, Priority::Medium, Priority::High]);

/// One step of a complaint's audit trail. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Status the complaint was in when the entry was written.
    pub step: String,
    pub date: String,
    pub time: String,
    pub remark: String,
    pub officer: String,
}

/// A citizen-filed grievance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Business key, generated by the filing client.
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub reporter_type: ReporterType,
    pub department: String,
    pub status: ComplaintStatus,
    pub priority: Priority,
    pub assigned_officer: String,
    /// Number of files attached at submission.
    pub attachments: u32,
    pub submitted_date: String,
    pub last_update: String,
    pub estimated_resolution: Option<String>,
    pub actual_resolution: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
