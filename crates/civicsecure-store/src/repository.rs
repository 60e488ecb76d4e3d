//! Storage-agnostic access to the complaint collection.

use civicsecure_shared::protocol::ComplaintStats;
use civicsecure_shared::validation::{ComplaintFilter, Pagination};
use civicsecure_shared::Complaint;

use crate::error::Result;

/// Create/find/update/delete over complaints, keyed by business id.
///
/// Implementations must report a duplicate business id on insert as
/// [`crate::StoreError::Conflict`].
pub trait ComplaintRepository {
    fn insert_complaint(&self, complaint: &Complaint) -> Result<()>;

    fn find_complaint(&self, id: &str) -> Result<Option<Complaint>>;

    /// One page of complaints matching `filter`, newest first, together with
    /// the number of matches across all pages.
    fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        page: &Pagination,
    ) -> Result<(Vec<Complaint>, u64)>;

    /// Load, mutate and save a complaint as one atomic step.
    ///
    /// Returns the saved record, or `None` when `id` does not exist.
    fn modify_complaint(
        &mut self,
        id: &str,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>>;

    /// Remove a complaint, returning the removed record.
    fn delete_complaint(&mut self, id: &str) -> Result<Option<Complaint>>;

    fn complaint_stats(&self) -> Result<ComplaintStats>;

    /// Whether the backing store currently answers queries.
    fn is_healthy(&self) -> bool;
}
