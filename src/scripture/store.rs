//! Loads the scripture corpus from a read-only SQLite file.
//!
//! The index is loaded once at startup and handed to [`crate::scripture::
//! index::ScriptureIndex`] as an immutable snapshot; there is deliberately
//! no live connection held afterward; every query downstream runs over
//! in-memory data with no lock on the hot path.

use std::path::Path;

use rusqlite::Connection;

use crate::scripture::types::ScriptureError;
use crate::types::{ScriptureLine, ScriptureSource};

/// Required minimum columns; any other expected column (`roman`, `ang`,
/// `raag`, `author`, `shabad_id`, `line_position`) is read if present and
/// left `None` otherwise.
const REQUIRED_COLUMNS: &[&str] = &["line_id", "source", "gurmukhi"];

pub fn load(path: &Path) -> Result<Vec<ScriptureLine>, ScriptureError> {
    if !path.exists() {
        return Err(ScriptureError::IndexFileMissing {
            path: path.display().to_string(),
        });
    }

    let conn = Connection::open(path).map_err(|e| ScriptureError::QueryFailed {
        message: format!("could not open scripture database: {e}"),
    })?;
    conn.pragma_update(None, "query_only", true).ok();

    let available = available_columns(&conn)?;
    for required in REQUIRED_COLUMNS {
        if !available.iter().any(|c| c == required) {
            return Err(ScriptureError::QueryFailed {
                message: format!("scripture database missing required column '{required}'"),
            });
        }
    }

    fn optional<'a>(available: &[String], name: &'a str) -> &'a str {
        if available.iter().any(|c| c == name) {
            name
        } else {
            "NULL"
        }
    }
    let optional = |name: &'static str| optional(&available, name);

    let query = format!(
        "SELECT line_id, source, gurmukhi, {roman}, {ang}, {raag}, {author}, {shabad_id}, {line_position} FROM scripture_lines",
        roman = optional("roman"),
        ang = optional("ang"),
        raag = optional("raag"),
        author = optional("author"),
        shabad_id = optional("shabad_id"),
        line_position = optional("line_position"),
    );

    let mut stmt = conn.prepare(&query).map_err(|e| ScriptureError::QueryFailed {
        message: format!("could not prepare scripture query: {e}"),
    })?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ScriptureLine {
                line_id: row.get::<_, String>(0)?,
                source: ScriptureSource::parse(&row.get::<_, String>(1)?),
                gurmukhi: row.get::<_, String>(2)?,
                roman: row.get::<_, Option<String>>(3)?,
                ang: row.get::<_, Option<i64>>(4)?.map(|v| v as u32),
                raag: row.get::<_, Option<String>>(5)?,
                author: row.get::<_, Option<String>>(6)?,
                shabad_id: row.get::<_, Option<String>>(7)?,
                line_position: row.get::<_, Option<i64>>(8)?.map(|v| v as u32),
            })
        })
        .map_err(|e| ScriptureError::QueryFailed {
            message: format!("could not run scripture query: {e}"),
        })?;

    let mut lines = Vec::new();
    for row in rows {
        match row {
            Ok(line) => lines.push(line),
            Err(e) => {
                // Corrupt rows are skipped and logged; they do not abort
                // the load.
                tracing::warn!(error = %e, "skipping corrupt scripture row");
            }
        }
    }
    Ok(lines)
}

fn available_columns(conn: &Connection) -> Result<Vec<String>, ScriptureError> {
    let mut stmt = conn
        .prepare("PRAGMA table_info(scripture_lines)")
        .map_err(|e| ScriptureError::QueryFailed {
            message: format!("could not inspect scripture schema: {e}"),
        })?;
    let cols = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| ScriptureError::QueryFailed {
            message: e.to_string(),
        })?
        .filter_map(Result::ok)
        .collect();
    Ok(cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn seed_db() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE scripture_lines (
                line_id TEXT, source TEXT, gurmukhi TEXT, roman TEXT,
                ang INTEGER, raag TEXT, author TEXT, shabad_id TEXT, line_position INTEGER
            );
            INSERT INTO scripture_lines VALUES
                ('l1', 'sggs', 'ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ', 'sati nāmu kartā purakhu', 1, NULL, 'Guru Nanak', 's1', 1);",
        )
        .unwrap();
        file
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load(Path::new("/nonexistent/scripture.db"));
        assert!(matches!(result, Err(ScriptureError::IndexFileMissing { .. })));
    }

    #[test]
    fn loads_seeded_rows() {
        let file = seed_db();
        let lines = load(file.path()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_id, "l1");
        assert_eq!(lines[0].ang, Some(1));
    }
}
