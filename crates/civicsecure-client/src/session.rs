//! Logout and the list of complaints filed from this device.

use crate::error::Result;
use crate::local_store::LocalStore;
use crate::state::NavState;

pub const SUBMITTED_KEY: &str = "submittedComplaints";

/// Every key removed on logout.
pub const LOGOUT_KEYS: [&str; 7] = [
    "userProfile",
    "aadhaarVerification",
    "complaintDraft",
    "userPreferences",
    "sessionData",
    SUBMITTED_KEY,
    "tempData",
];

/// Remove all session data. Each key is removed independently; a failure is
/// logged and does not stop the remaining removals. Returns how many keys
/// were actually present.
pub fn purge_local_data<S: LocalStore + ?Sized>(store: &S) -> usize {
    let mut removed = 0;
    for key in LOGOUT_KEYS {
        match store.remove(key) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!(key, error = %e, "Failed to clear local data"),
        }
    }
    removed
}

/// Clear local data and return to the dashboard.
pub fn logout<S: LocalStore + ?Sized>(store: &S, nav: &mut NavState) {
    let removed = purge_local_data(store);
    nav.reset();
    tracing::info!(removed, "Logged out");
}

/// Ids of complaints filed from this device, oldest first.
pub fn submitted_ids<S: LocalStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    match store.get(SUBMITTED_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

pub fn record_submitted<S: LocalStore + ?Sized>(store: &S, id: &str) -> Result<()> {
    let mut ids = submitted_ids(store).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Resetting unreadable submitted complaint list");
        Vec::new()
    });
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
    store.set(SUBMITTED_KEY, &serde_json::to_string(&ids)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::local_store::MemoryStore;
    use crate::state::{Page, View};
    use civicsecure_store::StoreError;

    /// Fails to remove one key, to check the others are still cleared.
    struct FlakyStore {
        inner: MemoryStore,
        broken_key: &'static str,
    }

    impl LocalStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<bool> {
            if key == self.broken_key {
                return Err(ClientError::Store(StoreError::Conflict("locked".into())));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn logout_clears_everything_and_resets_navigation() {
        let store = MemoryStore::new();
        for key in LOGOUT_KEYS {
            store.set(key, "{}").unwrap();
        }
        store.set("unrelated", "1").unwrap();

        let mut nav = NavState::new();
        nav.go(Page::Profile);
        nav.toggle_panel();

        logout(&store, &mut nav);

        assert_eq!(store.len(), 1);
        assert_eq!(nav.view(), View::Page(Page::Dashboard));
        assert!(!nav.is_panel_open());
    }

    #[test]
    fn one_failed_removal_does_not_stop_the_rest() {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            broken_key: "complaintDraft",
        };
        for key in LOGOUT_KEYS {
            store.set(key, "{}").unwrap();
        }

        assert_eq!(purge_local_data(&store), LOGOUT_KEYS.len() - 1);
        assert_eq!(store.inner.len(), 1);
        assert!(store.get("complaintDraft").unwrap().is_some());
    }

    #[test]
    fn submitted_ids_are_deduplicated() {
        let store = MemoryStore::new();
        assert!(submitted_ids(&store).unwrap().is_empty());

        record_submitted(&store, "CMP-2024-AAAA0001").unwrap();
        record_submitted(&store, "CMP-2024-AAAA0002").unwrap();
        record_submitted(&store, "CMP-2024-AAAA0001").unwrap();

        assert_eq!(
            submitted_ids(&store).unwrap(),
            vec!["CMP-2024-AAAA0001", "CMP-2024-AAAA0002"]
        );
    }
}
