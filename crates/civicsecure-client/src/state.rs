//! In-memory navigation state: which page is shown and whether the mobile
//! navigation panel is open. There is no routing history.

use std::fmt;

/// A page reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Dashboard,
    FileComplaint,
    TrackStatus,
    InfoHub,
    Community,
    AadhaarVerify,
    Profile,
}

impl Page {
    /// Sidebar order.
    pub const ALL: [Page; 7] = [
        Page::Dashboard,
        Page::FileComplaint,
        Page::TrackStatus,
        Page::InfoHub,
        Page::Community,
        Page::AadhaarVerify,
        Page::Profile,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::FileComplaint => "file-complaint",
            Page::TrackStatus => "track-status",
            Page::InfoHub => "info-hub",
            Page::Community => "community",
            Page::AadhaarVerify => "aadhaar-verify",
            Page::Profile => "profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::FileComplaint => "File Complaint",
            Page::TrackStatus => "Track Status",
            Page::InfoHub => "Info Hub",
            Page::Community => "Community",
            Page::AadhaarVerify => "Aadhaar Verify",
            Page::Profile => "Profile",
        }
    }

    pub fn from_id(id: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What the content area should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Page(Page),
    /// "Page under construction"
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    Page(Page),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    route: Route,
    panel_open: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavState {
    pub fn new() -> Self {
        Self {
            route: Route::Page(Page::Dashboard),
            panel_open: false,
        }
    }

    /// Switch to the page with the given id and close the mobile panel.
    pub fn select(&mut self, id: &str) -> View {
        self.route = match Page::from_id(id) {
            Some(page) => Route::Page(page),
            None => {
                tracing::debug!(id, "Navigated to unknown page");
                Route::Unknown(id.to_string())
            }
        };
        self.panel_open = false;
        self.view()
    }

    pub fn go(&mut self, page: Page) -> View {
        self.select(page.id())
    }

    pub fn view(&self) -> View {
        match self.route {
            Route::Page(page) => View::Page(page),
            Route::Unknown(_) => View::Placeholder,
        }
    }

    /// The selected page, `None` after navigating to an unknown id.
    pub fn current(&self) -> Option<Page> {
        match self.route {
            Route::Page(page) => Some(page),
            Route::Unknown(_) => None,
        }
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Back to the dashboard with the panel closed.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_dashboard() {
        let nav = NavState::new();
        assert_eq!(nav.view(), View::Page(Page::Dashboard));
        assert!(!nav.is_panel_open());
    }

    #[test]
    fn selection_closes_the_panel() {
        let mut nav = NavState::new();
        nav.toggle_panel();
        assert!(nav.is_panel_open());

        assert_eq!(nav.select("profile"), View::Page(Page::Profile));
        assert!(!nav.is_panel_open());
    }

    #[test]
    fn unknown_pages_render_placeholder() {
        let mut nav = NavState::new();
        assert_eq!(nav.select("settings"), View::Placeholder);
        assert_eq!(nav.current(), None);

        assert_eq!(nav.go(Page::InfoHub), View::Page(Page::InfoHub));
        assert_eq!(nav.current(), Some(Page::InfoHub));
    }

    #[test]
    fn sidebar_labels() {
        let labels: Vec<_> = Page::ALL.iter().map(Page::label).collect();
        assert_eq!(
            labels,
            [
                "Dashboard",
                "File Complaint",
                "Track Status",
                "Info Hub",
                "Community",
                "Aadhaar Verify",
                "Profile",
            ]
        );
    }

    #[test]
    fn ids_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_id(page.id()), Some(page));
        }
    }
}
