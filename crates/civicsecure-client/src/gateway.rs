//! Filing a complaint from a draft.

use std::future::Future;

use civicsecure_shared::protocol::CreateComplaintRequest;
use civicsecure_shared::Complaint;

use crate::cache::Clock;
use crate::draft::{generate_complaint_id, ComplaintDraft, DraftStore};
use crate::error::Result;
use crate::local_store::LocalStore;
use crate::session::record_submitted;

/// Anything that can create complaints on the server side.
pub trait ComplaintGateway {
    fn submit(
        &self,
        request: &CreateComplaintRequest,
    ) -> impl Future<Output = Result<Complaint>> + Send;
}

/// Validate `draft`, submit it, then clear the saved draft and remember the
/// new complaint id locally. Nothing local changes when any step fails.
pub async fn file_complaint<G, S, C>(
    gateway: &G,
    drafts: &DraftStore<S, C>,
    draft: &ComplaintDraft,
    verified: bool,
) -> Result<Complaint>
where
    G: ComplaintGateway,
    S: LocalStore,
    C: Clock,
{
    draft.validate(verified)?;

    let id = generate_complaint_id(drafts.cache().clock().now());
    let complaint = gateway.submit(&draft.to_request(id)).await?;
    tracing::info!(id = %complaint.id, category = %complaint.category, "Complaint filed");

    if let Err(e) = drafts.clear() {
        tracing::warn!(error = %e, "Failed to clear draft after submission");
    }
    record_submitted(drafts.cache().store(), &complaint.id)?;

    Ok(complaint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, TtlCache};
    use crate::error::ClientError;
    use crate::local_store::MemoryStore;
    use crate::session::submitted_ids;
    use chrono::{TimeZone, Utc};
    use civicsecure_shared::validation::validate_new_complaint;
    use civicsecure_shared::{lifecycle, ReporterType};
    use std::sync::{Arc, Mutex};

    /// Builds complaints locally the way the server would.
    #[derive(Default)]
    struct LocalGateway {
        received: Mutex<Vec<CreateComplaintRequest>>,
        fail: bool,
    }

    impl ComplaintGateway for LocalGateway {
        async fn submit(&self, request: &CreateComplaintRequest) -> Result<Complaint> {
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Error creating complaint".into(),
                });
            }
            self.received.lock().unwrap().push(request.clone());
            let input = validate_new_complaint(request.clone()).map_err(|e| ClientError::Api {
                status: 400,
                message: e.to_string(),
            })?;
            Ok(lifecycle::new_complaint(input, Utc::now()))
        }
    }

    fn drafts() -> DraftStore<Arc<MemoryStore>, ManualClock> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap());
        DraftStore::new(TtlCache::with_clock(Arc::new(MemoryStore::new()), clock))
    }

    fn draft() -> ComplaintDraft {
        ComplaintDraft {
            category: "theft".into(),
            description: "Bicycle stolen from the railway parking".into(),
            location: "Platform 2 parking".into(),
            reporter_type: ReporterType::Pseudonymous,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_filing_clears_draft_and_records_id() {
        let gateway = LocalGateway::default();
        let drafts = drafts();
        drafts.save(&draft()).unwrap();

        let complaint = file_complaint(&gateway, &drafts, &draft(), false).await.unwrap();

        assert!(complaint.id.starts_with("CMP-2025-"));
        assert_eq!(complaint.department, "Police Department");
        assert!(drafts.load().is_none());
        assert_eq!(submitted_ids(drafts.cache().store()).unwrap(), vec![complaint.id]);
        assert_eq!(gateway.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failures_keep_the_draft() {
        let drafts = drafts();
        drafts.save(&draft()).unwrap();

        let failing = LocalGateway {
            fail: true,
            ..Default::default()
        };
        let err = file_complaint(&failing, &drafts, &draft(), false).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(drafts.load(), Some(draft()));

        let gateway = LocalGateway::default();
        let unverified = ComplaintDraft {
            reporter_type: ReporterType::Verified,
            ..draft()
        };
        let err = file_complaint(&gateway, &drafts, &unverified, false).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(gateway.received.lock().unwrap().is_empty());
        assert!(submitted_ids(drafts.cache().store()).unwrap().is_empty());
    }
}
