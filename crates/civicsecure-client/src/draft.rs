//! Complaint drafts: client-side validation, conversion to an API request,
//! persistence under `complaintDraft` and debounced autosave.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use civicsecure_shared::protocol::CreateComplaintRequest;
use civicsecure_shared::{FieldErrors, ReporterType};

use crate::cache::{Clock, TtlCache};
use crate::error::{ClientError, Result};
use crate::local_store::LocalStore;

pub const DRAFT_KEY: &str = "complaintDraft";

pub fn draft_ttl() -> Duration {
    Duration::minutes(30)
}

/// Quiet period after the last edit before a draft is written.
pub const AUTOSAVE_DELAY: StdDuration = StdDuration::from_secs(2);

/// Categories offered by the complaint form, as `(value, label)`.
pub const CATEGORIES: [(&str, &str); 4] = [
    ("safety", "Safety"),
    ("theft", "Theft"),
    ("civic", "Civic Issue"),
    ("disaster", "Disaster"),
];

/// Department a complaint of the given category is routed to.
pub fn department_for(category: &str) -> &'static str {
    match category {
        "safety" | "theft" => "Police Department",
        "civic" => "Municipal Corporation",
        "disaster" => "Disaster Management Authority",
        _ => "General Administration",
    }
}

/// Business id of the form `CMP-2024-1A2B3C4D`.
pub fn generate_complaint_id(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("CMP-{}-{}", now.year(), suffix[..8].to_ascii_uppercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub reporter_type: ReporterType,
    pub attachment_names: Vec<String>,
}

impl ComplaintDraft {
    /// Nothing typed and nothing attached.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.category.trim().is_empty()
            && self.description.trim().is_empty()
            && self.location.trim().is_empty()
            && self.attachment_names.is_empty()
    }

    pub fn validate(&self, verified: bool) -> std::result::Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if !CATEGORIES.iter().any(|(value, _)| *value == self.category) {
            errors.insert("category", "Please select a category");
        }
        if self.description.trim().is_empty() {
            errors.insert("description", "Description is required");
        }
        if self.location.trim().is_empty() {
            errors.insert("location", "Location is required");
        }
        if self.reporter_type == ReporterType::Verified && !verified {
            errors.insert(
                "reporterType",
                "Aadhaar verification is required for verified complaints",
            );
        }

        errors.into_result(())
    }

    /// Title sent to the API: the typed title, or the start of the
    /// description when none was given.
    pub fn effective_title(&self) -> String {
        let title = self.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
        let description = self.description.trim();
        match description.char_indices().nth(60) {
            Some((cut, _)) => format!("{}...", description[..cut].trim_end()),
            None => description.to_string(),
        }
    }

    pub fn to_request(&self, id: String) -> CreateComplaintRequest {
        let category = self.category.trim();
        CreateComplaintRequest {
            id: Some(id),
            title: Some(self.effective_title()),
            category: Some(category.to_string()),
            description: Some(self.description.trim().to_string()),
            location: Some(self.location.trim().to_string()),
            department: Some(department_for(category).to_string()),
            reporter_type: Some(self.reporter_type.as_str().to_string()),
            attachments: Some(self.attachment_names.len() as u32),
            ..Default::default()
        }
    }
}

/// Draft persistence with a 30 minute lifetime.
pub struct DraftStore<S, C> {
    cache: TtlCache<S, C>,
}

impl<S: LocalStore, C: Clock> DraftStore<S, C> {
    pub fn new(cache: TtlCache<S, C>) -> Self {
        Self { cache }
    }

    pub fn load(&self) -> Option<ComplaintDraft> {
        self.cache.get(DRAFT_KEY, draft_ttl())
    }

    /// Persist `draft`. Empty drafts are skipped; returns whether it was written.
    pub fn save(&self, draft: &ComplaintDraft) -> Result<bool> {
        if draft.is_empty() {
            return Ok(false);
        }
        self.cache.set(DRAFT_KEY, draft)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        self.cache.clear(DRAFT_KEY)?;
        Ok(())
    }

    pub fn cache(&self) -> &TtlCache<S, C> {
        &self.cache
    }
}

/// Background task writing the latest draft once edits pause for the
/// configured delay. Each update restarts the wait; a pending draft is
/// flushed when the autosaver is finished.
pub struct DraftAutosaver<S, C> {
    tx: mpsc::UnboundedSender<ComplaintDraft>,
    task: JoinHandle<DraftStore<S, C>>,
}

impl<S, C> DraftAutosaver<S, C>
where
    S: LocalStore + Send + 'static,
    C: Clock + Send + 'static,
{
    pub fn spawn(drafts: DraftStore<S, C>) -> Self {
        Self::with_delay(drafts, AUTOSAVE_DELAY)
    }

    pub fn with_delay(drafts: DraftStore<S, C>, delay: StdDuration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(autosave_loop(drafts, rx, delay));
        Self { tx, task }
    }

    /// Record the latest form state.
    pub fn update(&self, draft: ComplaintDraft) {
        if self.tx.send(draft).is_err() {
            tracing::warn!("Draft autosave task is gone, dropping update");
        }
    }

    /// Flush any pending draft and hand the store back.
    pub async fn finish(self) -> Result<DraftStore<S, C>> {
        drop(self.tx);
        self.task
            .await
            .map_err(|e| ClientError::Task(e.to_string()))
    }
}

async fn autosave_loop<S: LocalStore, C: Clock>(
    drafts: DraftStore<S, C>,
    mut rx: mpsc::UnboundedReceiver<ComplaintDraft>,
    delay: StdDuration,
) -> DraftStore<S, C> {
    let mut pending: Option<ComplaintDraft> = None;

    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(draft) => pending = Some(draft),
                None => break,
            },
            Some(draft) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => {
                            persist(&drafts, &draft);
                            break;
                        }
                    },
                    _ = tokio::time::sleep(delay) => persist(&drafts, &draft),
                }
            }
        }
    }

    drafts
}

fn persist<S: LocalStore, C: Clock>(drafts: &DraftStore<S, C>, draft: &ComplaintDraft) {
    match drafts.save(draft) {
        Ok(true) => tracing::debug!("Draft saved"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to save draft"),
    }
}
