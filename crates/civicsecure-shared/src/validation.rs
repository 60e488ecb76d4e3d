//! Explicit schema validation for API payloads.
//!
//! Each function takes the raw request DTO and returns either a typed,
//! trimmed value or the full list of reasons it was rejected. Nothing here
//! touches persistence.

use chrono::NaiveDate;

use crate::constants::{
    DATE_FORMAT, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, REQUIRED_COMPLAINT_FIELDS,
};
use crate::error::ValidationErrors;
use crate::protocol::{CreateComplaintRequest, ListQuery, UpdateComplaintRequest};
use crate::types::{ComplaintStatus, HistoryEntry, Priority, ReporterType};

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub department: String,
    pub reporter_type: ReporterType,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub attachments: u32,
    pub submitted_date: Option<String>,
    pub last_update: Option<String>,
    pub estimated_resolution: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// An update request that passed validation. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintUpdate {
    pub status: Option<ComplaintStatus>,
    pub remark: Option<String>,
    pub officer: Option<String>,
    pub assigned_officer: Option<String>,
    pub priority: Option<Priority>,
}

/// Equality filters and pagination of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Trimmed value, or `None` for absent and whitespace-only input.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_enum<T: std::str::FromStr>(
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match present(value)?.parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e.to_string());
            None
        }
    }
}

fn check_date(field: &str, value: Option<String>, errors: &mut ValidationErrors) -> Option<String> {
    let value = present(value)?;
    if NaiveDate::parse_from_str(&value, DATE_FORMAT).is_err() {
        errors.push(format!("Invalid {field}: '{value}' (expected YYYY-MM-DD)"));
    }
    Some(value)
}

/// Validate a `POST /api/complaints` body.
///
/// Missing required fields are reported together as a single reason so the
/// caller sees every absent field at once.
pub fn validate_new_complaint(req: CreateComplaintRequest) -> Result<NewComplaint, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let id = present(req.id);
    let title = present(req.title);
    let category = present(req.category);
    let description = present(req.description);
    let location = present(req.location);
    let department = present(req.department);

    let supplied = [&id, &title, &category, &description, &location, &department];
    let missing: Vec<&str> = REQUIRED_COMPLAINT_FIELDS
        .into_iter()
        .zip(supplied)
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        errors.push(format!("Missing required fields: {}", missing.join(", ")));
    }

    let reporter_type = parse_enum(req.reporter_type, &mut errors).unwrap_or_default();
    let priority = parse_enum(req.priority, &mut errors).unwrap_or_default();
    let status = parse_enum(req.status, &mut errors).unwrap_or_default();

    let submitted_date = check_date("submittedDate", req.submitted_date, &mut errors);
    let last_update = check_date("lastUpdate", req.last_update, &mut errors);
    let estimated_resolution = check_date("estimatedResolution", req.estimated_resolution, &mut errors);

    let history = req.history.unwrap_or_default();
    for (i, entry) in history.iter().enumerate() {
        for (name, value) in [
            ("step", &entry.step),
            ("date", &entry.date),
            ("time", &entry.time),
            ("remark", &entry.remark),
            ("officer", &entry.officer),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("history[{i}].{name} is required"));
            }
        }
    }

    // Every required field is Some once `missing` is empty.
    let (Some(id), Some(title), Some(category), Some(description), Some(location), Some(department)) =
        (id, title, category, description, location, department)
    else {
        return Err(errors);
    };

    errors.into_result(NewComplaint {
        id,
        title,
        category,
        description,
        location,
        department,
        reporter_type,
        priority,
        status,
        attachments: req.attachments.unwrap_or(0),
        submitted_date,
        last_update,
        estimated_resolution,
        history,
    })
}

/// Validate a `PUT /api/complaints/:id` body. Empty strings count as absent.
pub fn validate_update(req: UpdateComplaintRequest) -> Result<ComplaintUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let status = parse_enum(req.status, &mut errors);
    let priority = parse_enum(req.priority, &mut errors);

    errors.into_result(ComplaintUpdate {
        status,
        remark: present(req.remark),
        officer: present(req.officer),
        assigned_officer: present(req.assigned_officer),
        priority,
    })
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Split a list query into filters and pagination, falling back to the
/// defaults for unusable `page`/`limit` values.
pub fn parse_list_query(query: ListQuery) -> (ComplaintFilter, Pagination) {
    let pagination = Pagination {
        page: positive_or(query.page.as_deref(), DEFAULT_PAGE),
        limit: positive_or(query.limit.as_deref(), DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
    };
    let filter = ComplaintFilter {
        status: present(query.status),
        category: present(query.category),
        priority: present(query.priority),
    };
    (filter, pagination)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateComplaintRequest {
        CreateComplaintRequest {
            id: Some("CMP-2025-0001".into()),
            title: Some("Pothole near Market Road".into()),
            category: Some("civic".into()),
            description: Some("Large pothole causing traffic jams".into()),
            location: Some("Market Road".into()),
            department: Some("Municipal Corporation".into()),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_request_with_defaults() {
        let new = validate_new_complaint(full_request()).unwrap();
        assert_eq!(new.reporter_type, ReporterType::Anonymous);
        assert_eq!(new.priority, Priority::Medium);
        assert_eq!(new.status, ComplaintStatus::Pending);
        assert_eq!(new.attachments, 0);
        assert!(new.history.is_empty());
    }

    #[test]
    fn reports_every_missing_field() {
        let req = CreateComplaintRequest {
            title: Some("   ".into()),
            department: None,
            ..full_request()
        };
        let errors = validate_new_complaint(req).unwrap_err();
        assert_eq!(errors.reasons(), ["Missing required fields: title, department"]);
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let req = CreateComplaintRequest {
            reporter_type: Some("celebrity".into()),
            priority: Some("Critical".into()),
            ..full_request()
        };
        let errors = validate_new_complaint(req).unwrap_err();
        assert_eq!(errors.reasons().len(), 2);
        assert!(errors.reasons()[0].starts_with("Invalid reporterType"));
    }

    #[test]
    fn rejects_malformed_dates_and_history() {
        let req = CreateComplaintRequest {
            submitted_date: Some("12/09/2025".into()),
            history: Some(vec![HistoryEntry {
                step: "Pending".into(),
                date: "2025-09-12".into(),
                time: "".into(),
                remark: "filed".into(),
                officer: "System".into(),
            }]),
            ..full_request()
        };
        let errors = validate_new_complaint(req).unwrap_err();
        assert!(errors.reasons().iter().any(|r| r.contains("submittedDate")));
        assert!(errors.reasons().iter().any(|r| r == "history[0].time is required"));
    }

    #[test]
    fn update_treats_empty_strings_as_absent() {
        let update = validate_update(UpdateComplaintRequest {
            status: Some("".into()),
            remark: Some("  Inspection scheduled ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.status, None);
        assert_eq!(update.remark.as_deref(), Some("Inspection scheduled"));
    }

    #[test]
    fn update_rejects_bad_status() {
        let errors = validate_update(UpdateComplaintRequest {
            status: Some("Closed".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.to_string().starts_with("Invalid status"));
    }

    #[test]
    fn list_query_falls_back_to_defaults() {
        let (filter, page) = parse_list_query(ListQuery {
            status: Some("Pending".into()),
            page: Some("abc".into()),
            limit: Some("0".into()),
            ..Default::default()
        });
        assert_eq!(filter.status.as_deref(), Some("Pending"));
        assert_eq!(page, Pagination { page: 1, limit: 10 });

        let (_, page) = parse_list_query(ListQuery {
            page: Some("3".into()),
            limit: Some("5000".into()),
            ..Default::default()
        });
        assert_eq!(page, Pagination { page: 3, limit: MAX_PAGE_LIMIT });
        assert_eq!(page.offset(), 200);
    }

    #[test]
    fn page_count_rounds_up() {
        let p = Pagination { page: 1, limit: 10 };
        assert_eq!(p.page_count(0), 0);
        assert_eq!(p.page_count(10), 1);
        assert_eq!(p.page_count(11), 2);
    }
}
