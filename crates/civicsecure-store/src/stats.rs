//! Aggregate counts over the complaint collection.

use rusqlite::params;

use civicsecure_shared::protocol::{CategoryCount, ComplaintStats, PriorityCount};
use civicsecure_shared::ComplaintStatus;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Totals per status plus grouped counts by category and by priority,
    /// each group ordered by count descending (ties broken by name).
    pub fn compute_stats(&self) -> Result<ComplaintStats> {
        let total: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM complaints", [], |row| row.get(0))?;

        let count_status = |status: ComplaintStatus| -> Result<u64> {
            let n: i64 = self.conn().query_row(
                "SELECT COUNT(*) FROM complaints WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        };

        let categories = self
            .grouped_counts("category")?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        let priorities = self
            .grouped_counts("priority")?
            .into_iter()
            .map(|(priority, count)| PriorityCount { priority, count })
            .collect();

        Ok(ComplaintStats {
            total: total as u64,
            pending: count_status(ComplaintStatus::Pending)?,
            in_review: count_status(ComplaintStatus::InReview)?,
            resolved: count_status(ComplaintStatus::Resolved)?,
            categories,
            priorities,
        })
    }

    /// `column` is always one of our own column names, never user input.
    fn grouped_counts(&self, column: &str) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {column}, COUNT(*) AS n FROM complaints
             GROUP BY {column}
             ORDER BY n DESC, {column} ASC"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
