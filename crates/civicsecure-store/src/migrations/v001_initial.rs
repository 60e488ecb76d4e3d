//! v001 -- Initial schema creation: the `complaints` table.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS complaints (
    seq                  INTEGER PRIMARY KEY AUTOINCREMENT,  -- internal identifier
    id                   TEXT NOT NULL UNIQUE,               -- business key
    title                TEXT NOT NULL,
    category             TEXT NOT NULL,
    description          TEXT NOT NULL,
    location             TEXT NOT NULL,
    reporter_type        TEXT NOT NULL DEFAULT 'anonymous',
    department           TEXT NOT NULL,
    status               TEXT NOT NULL DEFAULT 'Pending',
    priority             TEXT NOT NULL DEFAULT 'Medium',
    assigned_officer     TEXT NOT NULL DEFAULT 'Pending Assignment',
    attachments          INTEGER NOT NULL DEFAULT 0,
    submitted_date       TEXT NOT NULL,                      -- YYYY-MM-DD
    last_update          TEXT NOT NULL,                      -- YYYY-MM-DD
    estimated_resolution TEXT,
    actual_resolution    TEXT,
    history              TEXT NOT NULL DEFAULT '[]',         -- JSON array
    created_at           TEXT NOT NULL,                      -- RFC-3339
    updated_at           TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_complaints_created ON complaints(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_complaints_status ON complaints(status);
CREATE INDEX IF NOT EXISTS idx_complaints_category ON complaints(category);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
