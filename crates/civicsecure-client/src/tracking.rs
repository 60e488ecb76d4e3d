//! Complaint status lookup.

use std::collections::HashMap;
use std::future::Future;

use chrono::{NaiveDate, TimeZone, Utc};
use thiserror::Error;

use civicsecure_shared::constants::SYSTEM_OFFICER;
use civicsecure_shared::{Complaint, ComplaintStatus, HistoryEntry, Priority, ReporterType};

use crate::error::{ClientError, Result};

/// Read access to complaint records by id.
pub trait ComplaintSource {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Option<Complaint>>> + Send;
}

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Please enter a complaint ID")]
    MissingId,

    #[error("Complaint {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A found complaint with its position on the status timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedComplaint {
    pub complaint: Complaint,
    /// Index of the current status in [`ComplaintStatus::ALL`].
    pub step: usize,
}

impl TrackedComplaint {
    /// Each lifecycle status paired with whether it has been reached.
    pub fn timeline(&self) -> Vec<(ComplaintStatus, bool)> {
        ComplaintStatus::ALL
            .into_iter()
            .map(|status| (status, status.step_index() <= self.step))
            .collect()
    }
}

pub struct Tracker<S> {
    source: S,
}

impl<S: ComplaintSource> Tracker<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn track(&self, id: &str) -> std::result::Result<TrackedComplaint, TrackError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TrackError::MissingId);
        }

        match self.source.fetch(id).await? {
            Some(complaint) => Ok(TrackedComplaint {
                step: complaint.status.step_index(),
                complaint,
            }),
            None => {
                tracing::debug!(id, "Tracked complaint not found");
                Err(TrackError::NotFound(id.to_string()))
            }
        }
    }
}

/// Built-in records used when no API is reachable.
#[derive(Debug, Clone)]
pub struct DemoDirectory {
    records: HashMap<String, Complaint>,
}

impl Default for DemoDirectory {
    fn default() -> Self {
        Self::new()
    }
}

struct DemoStep {
    status: ComplaintStatus,
    date: &'static str,
    remark: &'static str,
}

impl DemoDirectory {
    pub fn new() -> Self {
        use ComplaintStatus::*;

        let records = [
            demo(
                "12345",
                "Pothole near Market Road",
                "civic",
                "Municipal Corporation",
                &[
                    DemoStep { status: Pending, date: "2025-09-10", remark: "Complaint filed successfully" },
                    DemoStep { status: InReview, date: "2025-09-12", remark: "Assigned to field officer for inspection" },
                ],
            ),
            demo(
                "67890",
                "Street Light not working",
                "civic",
                "Electricity Board",
                &[
                    DemoStep { status: Pending, date: "2025-09-08", remark: "Complaint filed successfully" },
                    DemoStep { status: InReview, date: "2025-09-09", remark: "Inspection scheduled and completed" },
                    DemoStep { status: Resolved, date: "2025-09-10", remark: "Street light repaired and tested" },
                ],
            ),
            demo(
                "54321",
                "Garbage collection delay",
                "civic",
                "Sanitation Department",
                &[DemoStep { status: Pending, date: "2025-09-14", remark: "Complaint registered and pending review" }],
            ),
        ];

        Self {
            records: records.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

fn demo(
    id: &str,
    title: &str,
    category: &str,
    department: &str,
    steps: &[DemoStep],
) -> Complaint {
    let history: Vec<HistoryEntry> = steps
        .iter()
        .map(|s| HistoryEntry {
            step: s.status.as_str().to_string(),
            date: s.date.to_string(),
            time: "10:00:00 AM".to_string(),
            remark: s.remark.to_string(),
            officer: SYSTEM_OFFICER.to_string(),
        })
        .collect();

    let first = steps.first().map(|s| s.date).unwrap_or_default();
    let last = steps.last().map(|s| s.date).unwrap_or_default();
    let status = steps.last().map(|s| s.status).unwrap_or_default();
    let at = |date: &str| {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .map(|dt| Utc.from_utc_datetime(&dt))
            .unwrap_or_default()
    };

    Complaint {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        description: title.to_string(),
        location: "Ward 12".to_string(),
        reporter_type: ReporterType::Anonymous,
        department: department.to_string(),
        status,
        priority: Priority::Medium,
        assigned_officer: SYSTEM_OFFICER.to_string(),
        attachments: 0,
        submitted_date: first.to_string(),
        last_update: last.to_string(),
        estimated_resolution: None,
        actual_resolution: (status == ComplaintStatus::Resolved).then(|| last.to_string()),
        history,
        created_at: at(first),
        updated_at: at(last),
    }
}

impl ComplaintSource for DemoDirectory {
    async fn fetch(&self, id: &str) -> Result<Option<Complaint>> {
        Ok(self.records.get(id).cloned())
    }
}
