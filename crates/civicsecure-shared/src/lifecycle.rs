//! Complaint lifecycle rules: the record built from a fresh submission and the
//! effect of a partial update on an existing record.
//!
//! All functions take `now` explicitly so that callers (and tests) control the
//! clock.

use chrono::{DateTime, Utc};

use crate::constants::{DATE_FORMAT, FILED_REMARK, SYSTEM_OFFICER, TIME_FORMAT, UNASSIGNED_OFFICER};
use crate::types::{Complaint, ComplaintStatus, HistoryEntry};
use crate::validation::{ComplaintUpdate, NewComplaint};

/// Calendar date as stored in `submittedDate`, `lastUpdate` and history entries.
pub fn date_string(now: DateTime<Utc>) -> String {
    now.format(DATE_FORMAT).to_string()
}

/// Wall-clock time as stored in history entries.
pub fn time_string(now: DateTime<Utc>) -> String {
    now.format(TIME_FORMAT).to_string()
}

/// Build the record persisted for a validated submission.
pub fn new_complaint(input: NewComplaint, now: DateTime<Utc>) -> Complaint {
    let today = date_string(now);

    let history = if input.history.is_empty() {
        vec![HistoryEntry {
            step: input.status.as_str().to_string(),
            date: today.clone(),
            time: time_string(now),
            remark: FILED_REMARK.to_string(),
            officer: SYSTEM_OFFICER.to_string(),
        }]
    } else {
        input.history
    };

    Complaint {
        id: input.id,
        title: input.title,
        category: input.category,
        description: input.description,
        location: input.location,
        reporter_type: input.reporter_type,
        department: input.department,
        status: input.status,
        priority: input.priority,
        assigned_officer: UNASSIGNED_OFFICER.to_string(),
        attachments: input.attachments,
        submitted_date: input.submitted_date.unwrap_or_else(|| today.clone()),
        last_update: input.last_update.unwrap_or_else(|| today.clone()),
        estimated_resolution: input.estimated_resolution,
        actual_resolution: if input.status == ComplaintStatus::Resolved {
            Some(today)
        } else {
            None
        },
        history,
        created_at: now,
        updated_at: now,
    }
}

/// Apply a partial update in place.
///
/// - a new `status` refreshes `lastUpdate`
/// - a `remark` appends exactly one history entry, stepped at the resulting status
/// - reaching `Resolved` stamps `actualResolution` unless it is already set
pub fn apply_update(complaint: &mut Complaint, update: &ComplaintUpdate, now: DateTime<Utc>) {
    let today = date_string(now);

    if let Some(status) = update.status {
        complaint.status = status;
        complaint.last_update = today.clone();
    }
    if let Some(officer) = &update.assigned_officer {
        complaint.assigned_officer = officer.clone();
    }
    if let Some(priority) = update.priority {
        complaint.priority = priority;
    }

    if let Some(remark) = &update.remark {
        complaint.history.push(HistoryEntry {
            step: complaint.status.as_str().to_string(),
            date: today.clone(),
            time: time_string(now),
            remark: remark.clone(),
            officer: update
                .officer
                .clone()
                .unwrap_or_else(|| SYSTEM_OFFICER.to_string()),
        });
    }

    if update.status == Some(ComplaintStatus::Resolved) && complaint.actual_resolution.is_none() {
        complaint.actual_resolution = Some(today);
    }

    complaint.updated_at = now;
}
