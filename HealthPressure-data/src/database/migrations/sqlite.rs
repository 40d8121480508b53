use rusqlite::Connection;
use tracing::{debug, info};

use crate::database::DatabaseError;

/// Run SQLite migrations.
///
/// Every statement is `IF NOT EXISTS`, so running this against an already
/// initialized database leaves tables and rows untouched.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_people_table(conn)?;
    create_readings_table(conn)?;
    create_readings_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the people table
fn create_people_table(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Creating people table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS people (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            weight_kg REAL NOT NULL,
            height_cm REAL NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| DatabaseError::MigrationError(format!("people table: {}", e)))?;

    Ok(())
}

/// Create the readings table.
///
/// The foreign key documents the relationship only. Pooled connections run
/// with `PRAGMA foreign_keys = OFF` (see `configure_connection`), so inserts
/// never check `person_id` and the cascade on person removal is carried out
/// explicitly inside a transaction.
fn create_readings_table(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Creating readings table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id INTEGER NOT NULL,
            systolic INTEGER NOT NULL,
            diastolic INTEGER NOT NULL,
            heart_rate INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            notes TEXT,
            FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
        )",
        [],
    ).map_err(|e| DatabaseError::MigrationError(format!("readings table: {}", e)))?;

    Ok(())
}

/// Create index for per-person, newest-first lookups
fn create_readings_index(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Creating index on readings (person_id, timestamp)");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_readings_person_timestamp
        ON readings (person_id, timestamp DESC)",
        [],
    ).map_err(|e| DatabaseError::MigrationError(format!("readings index: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::configure_connection;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_run_migrations_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(table_names(&conn), vec!["people".to_string(), "readings".to_string()]);
    }

    #[test]
    fn test_run_migrations_twice_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO people (name, age, weight_kg, height_cm, created_at)
             VALUES ('Ana', 40, 70.0, 170.0, '2024-01-01 00:00:00+00:00')",
            [],
        ).unwrap();

        run_migrations(&conn).unwrap();

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_readings_insert_without_person_is_allowed() {
        let mut conn = Connection::open_in_memory().unwrap();
        configure_connection(&mut conn).unwrap();
        run_migrations(&conn).unwrap();

        let inserted = conn.execute(
            "INSERT INTO readings (person_id, systolic, diastolic, heart_rate, timestamp)
             VALUES (999, 120, 80, 70, '2024-01-01 00:00:00+00:00')",
            [],
        ).unwrap();
        assert_eq!(inserted, 1);
    }
}
