/// Application name
pub const APP_NAME: &str = "CivicSecure";

/// Officer recorded on history entries written without an explicit officer
pub const SYSTEM_OFFICER: &str = "System";

/// Initial value of `assignedOfficer`
pub const UNASSIGNED_OFFICER: &str = "Pending Assignment";

/// Remark of the history entry synthesized when a complaint is filed
pub const FILED_REMARK: &str =
    "Complaint filed successfully via online portal. Complaint ID generated and confirmation sent.";

/// Fields that must be present and non-empty on complaint creation
pub const REQUIRED_COMPLAINT_FIELDS: [&str; 6] =
    ["id", "title", "category", "description", "location", "department"];

/// Default page for complaint listing
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for complaint listing
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size the API will serve
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Date format used for `submittedDate`, `lastUpdate` and history dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 12-hour clock format used for history entry times (e.g. `3:07:45 PM`)
pub const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Maximum size of an uploaded image (profile photo, Aadhaar card side): 5 MiB
pub const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 5000;
