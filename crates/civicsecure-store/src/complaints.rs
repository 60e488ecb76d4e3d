//! SQLite implementation of [`ComplaintRepository`].

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, TransactionBehavior};

use civicsecure_shared::protocol::ComplaintStats;
use civicsecure_shared::validation::{ComplaintFilter, Pagination};
use civicsecure_shared::{Complaint, HistoryEntry};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::repository::ComplaintRepository;

const COLUMNS: &str = "id, title, category, description, location, reporter_type, department,
     status, priority, assigned_officer, attachments, submitted_date, last_update,
     estimated_resolution, actual_resolution, history, created_at, updated_at";

/// Fixed-width UTC timestamps so that text ordering equals time ordering.
fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl ComplaintRepository for Database {
    fn insert_complaint(&self, c: &Complaint) -> Result<()> {
        let history = serde_json::to_string(&c.history)?;
        self.conn()
            .execute(
                "INSERT INTO complaints (id, title, category, description, location, reporter_type,
                     department, status, priority, assigned_officer, attachments, submitted_date,
                     last_update, estimated_resolution, actual_resolution, history, created_at,
                     updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                params![
                    c.id,
                    c.title,
                    c.category,
                    c.description,
                    c.location,
                    c.reporter_type.as_str(),
                    c.department,
                    c.status.as_str(),
                    c.priority.as_str(),
                    c.assigned_officer,
                    c.attachments,
                    c.submitted_date,
                    c.last_update,
                    c.estimated_resolution,
                    c.actual_resolution,
                    history,
                    ts(&c.created_at),
                    ts(&c.updated_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, &c.id))?;
        Ok(())
    }

    fn find_complaint(&self, id: &str) -> Result<Option<Complaint>> {
        let complaint = self
            .conn()
            .query_row(
                &format!("SELECT {COLUMNS} FROM complaints WHERE id = ?1"),
                params![id],
                row_to_complaint,
            )
            .optional()?;
        Ok(complaint)
    }

    fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        page: &Pagination,
    ) -> Result<(Vec<Complaint>, u64)> {
        let mut clauses = Vec::new();
        let mut args: Vec<&str> = Vec::new();
        for (column, value) in [
            ("status", &filter.status),
            ("category", &filter.category),
            ("priority", &filter.priority),
        ] {
            if let Some(value) = value {
                args.push(value);
                clauses.push(format!("{column} = ?{}", args.len()));
            }
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let total: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM complaints{where_sql}"),
            params_from_iter(args.iter()),
            |row| row.get(0),
        )?;

        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COLUMNS} FROM complaints{where_sql}
             ORDER BY created_at DESC, seq DESC
             LIMIT {} OFFSET {}",
            page.limit,
            page.offset()
        ))?;
        let rows = stmt.query_map(params_from_iter(args.iter()), row_to_complaint)?;

        let mut complaints = Vec::new();
        for row in rows {
            complaints.push(row?);
        }
        Ok((complaints, total as u64))
    }

    fn modify_complaint(
        &mut self,
        id: &str,
        apply: &mut dyn FnMut(&mut Complaint),
    ) -> Result<Option<Complaint>> {
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM complaints WHERE id = ?1"),
                params![id],
                row_to_complaint,
            )
            .optional()?;
        let Some(mut complaint) = existing else {
            return Ok(None);
        };

        apply(&mut complaint);

        tx.execute(
            "UPDATE complaints SET
                 status = ?2, priority = ?3, assigned_officer = ?4, last_update = ?5,
                 actual_resolution = ?6, history = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                complaint.id,
                complaint.status.as_str(),
                complaint.priority.as_str(),
                complaint.assigned_officer,
                complaint.last_update,
                complaint.actual_resolution,
                serde_json::to_string(&complaint.history)?,
                ts(&complaint.updated_at),
            ],
        )?;
        tx.commit()?;

        Ok(Some(complaint))
    }

    fn delete_complaint(&mut self, id: &str) -> Result<Option<Complaint>> {
        let tx = self.conn_mut().transaction()?;
        let existing = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM complaints WHERE id = ?1"),
                params![id],
                row_to_complaint,
            )
            .optional()?;
        if existing.is_some() {
            tx.execute("DELETE FROM complaints WHERE id = ?1", params![id])?;
        }
        tx.commit()?;
        Ok(existing)
    }

    fn complaint_stats(&self) -> Result<ComplaintStats> {
        self.compute_stats()
    }

    fn is_healthy(&self) -> bool {
        self.ping()
    }
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

fn parse_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn row_to_complaint(row: &rusqlite::Row<'_>) -> rusqlite::Result<Complaint> {
    let history_json: String = row.get(15)?;
    let history: Vec<HistoryEntry> =
        serde_json::from_str(&history_json).map_err(|e| conversion_error(15, e))?;

    Ok(Complaint {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        reporter_type: parse_column(row, 5)?,
        department: row.get(6)?,
        status: parse_column(row, 7)?,
        priority: parse_column(row, 8)?,
        assigned_officer: row.get(9)?,
        attachments: row.get(10)?,
        submitted_date: row.get(11)?,
        last_update: row.get(12)?,
        estimated_resolution: row.get(13)?,
        actual_resolution: row.get(14)?,
        history,
        created_at: parse_timestamp(row, 16)?,
        updated_at: parse_timestamp(row, 17)?,
    })
}
