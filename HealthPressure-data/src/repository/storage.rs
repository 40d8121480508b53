use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::{NewPerson, NewReading, Person, Reading};
use super::errors::RepositoryError;

const PERSON_COLUMNS: &str = "id, name, age, weight_kg, height_cm, created_at";
const READING_COLUMNS: &str = "id, person_id, systolic, diastolic, heart_rate, timestamp, notes";

/// SQLite storage operations for people and readings
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert a person and return the assigned id
    pub fn insert_person(conn: &Connection, person: &NewPerson, created_at: DateTime<Utc>) -> Result<i64, RepositoryError> {
        debug!("Inserting person into database: name={}", person.name);

        conn.execute(
            "INSERT INTO people (name, age, weight_kg, height_cm, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![person.name, person.age, person.weight_kg, person.height_cm, created_at],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get all people ordered by name
    pub fn get_all_persons(conn: &Connection) -> Result<Vec<Person>, RepositoryError> {
        debug!("Getting all people from database");

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM people ORDER BY name ASC, id ASC",
            PERSON_COLUMNS
        ))?;

        let people = stmt
            .query_map([], person_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(people)
    }

    /// Get a person by id
    pub fn get_person(conn: &Connection, id: i64) -> Result<Option<Person>, RepositoryError> {
        debug!("Getting person by ID from database: id={}", id);

        let person = conn
            .query_row(
                &format!("SELECT {} FROM people WHERE id = ?1", PERSON_COLUMNS),
                [id],
                person_from_row,
            )
            .optional()?;

        Ok(person)
    }

    /// Overwrite every column of a person row, returning the number of rows changed
    pub fn update_person(conn: &Connection, person: &Person) -> Result<usize, RepositoryError> {
        debug!("Updating person in database: id={}", person.id);

        let changed = conn.execute(
            "UPDATE people
             SET name = ?1, age = ?2, weight_kg = ?3, height_cm = ?4, created_at = ?5
             WHERE id = ?6",
            params![
                person.name,
                person.age,
                person.weight_kg,
                person.height_cm,
                person.created_at,
                person.id,
            ],
        )?;

        Ok(changed)
    }

    /// Delete a person and all of their readings in one transaction.
    ///
    /// Returns whether the person row existed.
    pub fn delete_person_cascade(conn: &mut Connection, id: i64) -> Result<bool, RepositoryError> {
        debug!("Deleting person and readings from database: id={}", id);

        let tx = conn.transaction()?;
        let readings_removed = tx.execute("DELETE FROM readings WHERE person_id = ?1", [id])?;
        let people_removed = tx.execute("DELETE FROM people WHERE id = ?1", [id])?;
        tx.commit()?;

        debug!("Deleted person id={} ({} rows) with {} readings", id, people_removed, readings_removed);
        Ok(people_removed > 0)
    }

    /// Insert a reading and return the assigned id
    pub fn insert_reading(conn: &Connection, reading: &NewReading) -> Result<i64, RepositoryError> {
        debug!("Inserting reading into database: person_id={}", reading.person_id);

        conn.execute(
            "INSERT INTO readings (person_id, systolic, diastolic, heart_rate, timestamp, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                reading.person_id,
                reading.systolic,
                reading.diastolic,
                reading.heart_rate,
                reading.timestamp,
                reading.notes,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a reading by id
    pub fn get_reading(conn: &Connection, id: i64) -> Result<Option<Reading>, RepositoryError> {
        debug!("Getting reading by ID from database: id={}", id);

        let reading = conn
            .query_row(
                &format!("SELECT {} FROM readings WHERE id = ?1", READING_COLUMNS),
                [id],
                reading_from_row,
            )
            .optional()?;

        Ok(reading)
    }

    /// Get a person's readings, newest first, optionally truncated to `limit`.
    /// A zero limit means no limit.
    pub fn get_readings_for_person(
        conn: &Connection,
        person_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Reading>, RepositoryError> {
        debug!("Getting readings from database: person_id={}, limit={:?}", person_id, limit);

        // A negative LIMIT means no limit in SQLite
        let limit_val = limit
            .filter(|&l| l > 0)
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM readings WHERE person_id = ?1
             ORDER BY timestamp DESC, id DESC LIMIT ?2",
            READING_COLUMNS
        ))?;

        let readings = stmt
            .query_map(params![person_id, limit_val], reading_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Get a person's readings with `start <= timestamp < end`, newest first
    pub fn get_readings_between(
        conn: &Connection,
        person_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, RepositoryError> {
        debug!("Getting readings from database: person_id={}, window=[{}, {})", person_id, start, end);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM readings
             WHERE person_id = ?1 AND timestamp >= ?2 AND timestamp < ?3
             ORDER BY timestamp DESC, id DESC",
            READING_COLUMNS
        ))?;

        let readings = stmt
            .query_map(params![person_id, start, end], reading_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Delete a single reading, returning whether it existed
    pub fn delete_reading(conn: &Connection, id: i64) -> Result<bool, RepositoryError> {
        debug!("Deleting reading from database: id={}", id);

        let removed = conn.execute("DELETE FROM readings WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        weight_kg: row.get(3)?,
        height_cm: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<Reading> {
    Ok(Reading {
        id: row.get(0)?,
        person_id: row.get(1)?,
        systolic: row.get(2)?,
        diastolic: row.get(3)?,
        heart_rate: row.get(4)?,
        timestamp: row.get(5)?,
        notes: row.get(6)?,
    })
}
