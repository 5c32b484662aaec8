//! Recently opened documents
//!
//! Db-backed list, newest first, deduplicated by path and capped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vellum_storage::Database;

use crate::Result;

const MAX_RECENT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentDocument {
    pub path: String,
    pub name: String,
    pub document_type: String,
    pub opened_at: DateTime<Utc>,
}

pub struct RecentDocuments {
    db: Database,
}

impl RecentDocuments {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record an open: insert or bump the entry for `path`, then prune
    /// everything past the cap.
    pub fn touch(&self, path: &str, name: &str, document_type: &str) -> Result<()> {
        let opened_at = Utc::now().to_rfc3339();

        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO recent_documents (path, name, document_type, opened_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![path, name, document_type, opened_at],
            )?;
            conn.execute(
                "DELETE FROM recent_documents WHERE path NOT IN
                 (SELECT path FROM recent_documents ORDER BY opened_at DESC LIMIT ?1)",
                [MAX_RECENT as i64],
            )?;
            Ok(())
        })?;

        Ok(())
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<RecentDocument>> {
        let documents = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT path, name, document_type, opened_at
                 FROM recent_documents ORDER BY opened_at DESC",
            )?;

            let documents: Vec<RecentDocument> = stmt
                .query_map([], |row| {
                    let opened_str: String = row.get(3)?;
                    let opened_at = DateTime::parse_from_rfc3339(&opened_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());

                    Ok(RecentDocument {
                        path: row.get(0)?,
                        name: row.get(1)?,
                        document_type: row.get(2)?,
                        opened_at,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(documents)
        })?;

        Ok(documents)
    }

    pub fn remove(&self, path: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM recent_documents WHERE path = ?1", [path])?;
            Ok(())
        })?;

        Ok(())
    }
}

impl Clone for RecentDocuments {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_and_list() {
        let db = Database::open_in_memory().unwrap();
        let recent = RecentDocuments::new(db);

        recent
            .touch("/docs/a.phd", "A", "powerhouse/budget-statement")
            .unwrap();
        recent
            .touch("/docs/b.phd", "B", "makerdao/scope-framework")
            .unwrap();

        let listed = recent.list().unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_touch_deduplicates_by_path() {
        let db = Database::open_in_memory().unwrap();
        let recent = RecentDocuments::new(db);

        recent
            .touch("/docs/a.phd", "A", "powerhouse/budget-statement")
            .unwrap();
        recent
            .touch("/docs/a.phd", "A renamed", "powerhouse/budget-statement")
            .unwrap();

        let listed = recent.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "A renamed");
    }

    #[test]
    fn test_remove() {
        let db = Database::open_in_memory().unwrap();
        let recent = RecentDocuments::new(db);

        recent
            .touch("/docs/a.phd", "A", "powerhouse/budget-statement")
            .unwrap();
        recent.remove("/docs/a.phd").unwrap();

        assert!(recent.list().unwrap().is_empty());
    }
}
