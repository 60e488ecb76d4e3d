//! Dashboard summary and display preferences.

use serde::{Deserialize, Serialize};

use civicsecure_shared::protocol::{ComplaintStats, ListQuery};
use civicsecure_shared::{Complaint, ComplaintStatus};

use crate::api_client::ApiClient;
use crate::error::Result;
use crate::local_store::LocalStore;

pub const PREFERENCES_KEY: &str = "userPreferences";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentComplaint {
    pub id: String,
    pub category: String,
    pub status: ComplaintStatus,
    pub date: String,
}

impl From<&Complaint> for RecentComplaint {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id.clone(),
            category: c.category.clone(),
            status: c.status,
            date: c.submitted_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub cards: [StatCard; 4],
    pub recent: Vec<RecentComplaint>,
}

impl DashboardSummary {
    pub fn from_stats(stats: &ComplaintStats, recent: &[Complaint]) -> Self {
        Self {
            cards: [
                StatCard { label: "Total Complaints", value: stats.total },
                StatCard { label: "Resolved", value: stats.resolved },
                StatCard { label: "Pending", value: stats.pending },
                StatCard { label: "In Review", value: stats.in_review },
            ],
            recent: recent.iter().map(RecentComplaint::from).collect(),
        }
    }

    /// Fetch the counts and the `recent` newest complaints.
    pub async fn load(api: &ApiClient, recent: u32) -> Result<Self> {
        let query = ListQuery {
            limit: Some(recent.to_string()),
            ..Default::default()
        };
        let (stats, page) = tokio::try_join!(api.stats(), api.list(&query))?;
        Ok(Self::from_stats(&stats, &page.complaints))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
}

impl Preferences {
    /// Stored preferences, or defaults when absent or unreadable.
    pub fn load<S: LocalStore + ?Sized>(store: &S) -> Self {
        match store.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read preferences");
                Self::default()
            }
        }
    }

    pub fn save<S: LocalStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.set(PREFERENCES_KEY, &serde_json::to_string(self)?)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.theme
    }
}
