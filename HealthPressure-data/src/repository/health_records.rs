use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::database::migrations::run_sqlite_migrations;
use crate::database::{open_database_pool, DatabaseConfig, PooledConnection, SqlitePool};
use crate::models::{NewPerson, NewReading, Person, Reading};
use super::errors::RepositoryError;
use super::storage::DatabaseStorage;
use super::week::current_week_bounds;

/// Repository trait for people and their readings
#[async_trait]
pub trait HealthRecordRepositoryTrait: Send + Sync {
    /// Create the schema and make the store usable. Safe to call repeatedly.
    async fn init(&self) -> Result<(), RepositoryError>;

    /// Release the underlying storage; later calls fail as if never initialized
    async fn close(&self) -> Result<(), RepositoryError>;

    /// Insert a person and return the assigned id
    async fn add_person(&self, person: NewPerson) -> Result<i64, RepositoryError>;

    /// Get all people sorted by name
    async fn get_all_persons(&self) -> Result<Vec<Person>, RepositoryError>;

    /// Get a person by id
    async fn get_person(&self, id: i64) -> Result<Option<Person>, RepositoryError>;

    /// Overwrite the stored row with the same id
    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError>;

    /// Delete a person together with all of their readings
    async fn delete_person(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Insert a reading and return the assigned id
    async fn add_reading(&self, reading: NewReading) -> Result<i64, RepositoryError>;

    /// Get a reading by id
    async fn get_reading(&self, id: i64) -> Result<Option<Reading>, RepositoryError>;

    /// Get a person's readings newest first, truncated to `limit` if given.
    ///
    /// A limit of zero is treated like `None` and returns every reading.
    async fn get_readings_for_person(
        &self,
        person_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Reading>, RepositoryError>;

    /// Get a person's readings in `[start, end)`, newest first
    async fn get_readings_for_person_between(
        &self,
        person_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, RepositoryError>;

    /// Get a person's readings taken during the current Sunday-based week
    async fn get_readings_for_person_in_current_week(&self, person_id: i64) -> Result<Vec<Reading>, RepositoryError> {
        let (start, end) = current_week_bounds();
        self.get_readings_for_person_between(person_id, start, end).await
    }

    /// Delete a single reading. Absent ids are a no-op reported as `false`.
    async fn delete_reading(&self, id: i64) -> Result<bool, RepositoryError>;
}

/// SQLite-backed record store.
///
/// Constructed explicitly and shared by reference; holds no global state.
pub struct HealthRecordStore {
    config: DatabaseConfig,
    pool: RwLock<Option<Arc<SqlitePool>>>,
}

impl HealthRecordStore {
    /// Create a store for `config`. Nothing is opened until `init()`.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    /// Create a store over a fresh private in-memory database
    pub fn in_memory() -> Self {
        Self::new(DatabaseConfig::in_memory())
    }

    /// Whether `init()` has completed and `close()` has not been called since
    pub fn is_initialized(&self) -> bool {
        self.pool.read().map(|pool| pool.is_some()).unwrap_or(false)
    }

    fn connection(&self) -> Result<PooledConnection, RepositoryError> {
        let pool = self.pool.read()?.clone().ok_or(RepositoryError::Uninitialized)?;
        Ok(pool.get()?)
    }
}

impl fmt::Debug for HealthRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthRecordStore")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl HealthRecordRepositoryTrait for HealthRecordStore {
    async fn init(&self) -> Result<(), RepositoryError> {
        let mut slot = self.pool.write()?;

        match slot.as_ref() {
            Some(pool) => {
                debug!("Record store already initialized, re-checking schema");
                let conn = pool.get()?;
                run_sqlite_migrations(&conn)?;
            }
            None => {
                let pool = open_database_pool(&self.config).map_err(|e| {
                    error!("Failed to open record store: {}", e);
                    e
                })?;
                *slot = Some(pool);
                info!("Record store initialized");
            }
        }

        Ok(())
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        if self.pool.write()?.take().is_some() {
            info!("Record store closed");
        }
        Ok(())
    }

    async fn add_person(&self, person: NewPerson) -> Result<i64, RepositoryError> {
        let conn = self.connection()?;
        let created_at = person.created_at.unwrap_or_else(Utc::now);
        DatabaseStorage::insert_person(&conn, &person, created_at)
    }

    async fn get_all_persons(&self) -> Result<Vec<Person>, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::get_all_persons(&conn)
    }

    async fn get_person(&self, id: i64) -> Result<Option<Person>, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::get_person(&conn, id)
    }

    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        match DatabaseStorage::update_person(&conn, person)? {
            0 => Err(RepositoryError::NotFound(format!("person with ID {}", person.id))),
            _ => Ok(()),
        }
    }

    async fn delete_person(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut conn = self.connection()?;
        DatabaseStorage::delete_person_cascade(&mut conn, id).map_err(|e| {
            error!("Cascade delete of person {} rolled back: {}", id, e);
            e
        })
    }

    async fn add_reading(&self, reading: NewReading) -> Result<i64, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::insert_reading(&conn, &reading)
    }

    async fn get_reading(&self, id: i64) -> Result<Option<Reading>, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::get_reading(&conn, id)
    }

    async fn get_readings_for_person(
        &self,
        person_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Reading>, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::get_readings_for_person(&conn, person_id, limit)
    }

    async fn get_readings_for_person_between(
        &self,
        person_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::get_readings_between(&conn, person_id, start, end)
    }

    async fn delete_reading(&self, id: i64) -> Result<bool, RepositoryError> {
        let conn = self.connection()?;
        DatabaseStorage::delete_reading(&conn, id)
    }
}

/// Mock record repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct MockState {
        initialized: bool,
        next_person_id: i64,
        next_reading_id: i64,
        people: BTreeMap<i64, Person>,
        readings: BTreeMap<i64, Reading>,
    }

    /// In-process implementation of [`HealthRecordRepositoryTrait`] for tests
    #[derive(Debug)]
    pub struct MockHealthRecordRepository {
        state: Mutex<MockState>,
        fail_storage: bool,
    }

    impl Default for MockHealthRecordRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockHealthRecordRepository {
        /// Create an empty, initialized mock repository
        pub fn new() -> Self {
            Self {
                state: Mutex::new(MockState {
                    initialized: true,
                    next_person_id: 1,
                    next_reading_id: 1,
                    ..MockState::default()
                }),
                fail_storage: false,
            }
        }

        /// Create a mock that behaves as if `init()` was never called
        pub fn uninitialized() -> Self {
            let mock = Self::new();
            if let Ok(mut state) = mock.state.lock() {
                state.initialized = false;
            }
            mock
        }

        /// Configure the mock to fail every operation with a storage error
        pub fn with_storage_failure(mut self) -> Self {
            self.fail_storage = true;
            self
        }

        /// Create a mock repository with predefined rows
        pub fn with_records(people: Vec<Person>, readings: Vec<Reading>) -> Self {
            let mock = Self::new();
            if let Ok(mut state) = mock.state.lock() {
                for person in people {
                    state.next_person_id = state.next_person_id.max(person.id + 1);
                    state.people.insert(person.id, person);
                }
                for reading in readings {
                    state.next_reading_id = state.next_reading_id.max(reading.id + 1);
                    state.readings.insert(reading.id, reading);
                }
            }
            mock
        }

        fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> Result<T, RepositoryError> {
            if self.fail_storage {
                return Err(simulated_io_error());
            }
            let mut state = self.state.lock()?;
            if !state.initialized {
                return Err(RepositoryError::Uninitialized);
            }
            Ok(f(&mut *state))
        }

        fn select_readings(
            &self,
            filter: impl Fn(&Reading) -> bool,
            limit: Option<usize>,
        ) -> Result<Vec<Reading>, RepositoryError> {
            self.with_state(|state| {
                let mut readings: Vec<Reading> = state.readings.values().filter(|r| filter(r)).cloned().collect();
                readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
                readings.truncate(limit.filter(|&l| l > 0).unwrap_or(usize::MAX));
                readings
            })
        }
    }

    fn simulated_io_error() -> RepositoryError {
        RepositoryError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
            Some("simulated disk I/O error".to_string()),
        ))
    }

    #[async_trait]
    impl HealthRecordRepositoryTrait for MockHealthRecordRepository {
        async fn init(&self) -> Result<(), RepositoryError> {
            if self.fail_storage {
                return Err(simulated_io_error());
            }
            self.state.lock()?.initialized = true;
            Ok(())
        }

        async fn close(&self) -> Result<(), RepositoryError> {
            self.state.lock()?.initialized = false;
            Ok(())
        }

        async fn add_person(&self, person: NewPerson) -> Result<i64, RepositoryError> {
            self.with_state(|state| {
                let id = state.next_person_id;
                state.next_person_id += 1;
                state.people.insert(id, Person {
                    id,
                    name: person.name,
                    age: person.age,
                    weight_kg: person.weight_kg,
                    height_cm: person.height_cm,
                    created_at: person.created_at.unwrap_or_else(Utc::now),
                });
                id
            })
        }

        async fn get_all_persons(&self) -> Result<Vec<Person>, RepositoryError> {
            self.with_state(|state| {
                let mut people: Vec<Person> = state.people.values().cloned().collect();
                people.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                people
            })
        }

        async fn get_person(&self, id: i64) -> Result<Option<Person>, RepositoryError> {
            self.with_state(|state| state.people.get(&id).cloned())
        }

        async fn update_person(&self, person: &Person) -> Result<(), RepositoryError> {
            self.with_state(|state| match state.people.get_mut(&person.id) {
                Some(stored) => {
                    *stored = person.clone();
                    Ok(())
                }
                None => Err(RepositoryError::NotFound(format!("person with ID {}", person.id))),
            })?
        }

        async fn delete_person(&self, id: i64) -> Result<bool, RepositoryError> {
            self.with_state(|state| {
                state.readings.retain(|_, reading| reading.person_id != id);
                state.people.remove(&id).is_some()
            })
        }

        async fn add_reading(&self, reading: NewReading) -> Result<i64, RepositoryError> {
            self.with_state(|state| {
                let id = state.next_reading_id;
                state.next_reading_id += 1;
                state.readings.insert(id, Reading {
                    id,
                    person_id: reading.person_id,
                    systolic: reading.systolic,
                    diastolic: reading.diastolic,
                    heart_rate: reading.heart_rate,
                    timestamp: reading.timestamp,
                    notes: reading.notes,
                });
                id
            })
        }

        async fn get_reading(&self, id: i64) -> Result<Option<Reading>, RepositoryError> {
            self.with_state(|state| state.readings.get(&id).cloned())
        }

        async fn get_readings_for_person(
            &self,
            person_id: i64,
            limit: Option<usize>,
        ) -> Result<Vec<Reading>, RepositoryError> {
            self.select_readings(|r| r.person_id == person_id, limit)
        }

        async fn get_readings_for_person_between(
            &self,
            person_id: i64,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Reading>, RepositoryError> {
            self.select_readings(
                |r| r.person_id == person_id && r.timestamp >= start && r.timestamp < end,
                None,
            )
        }

        async fn delete_reading(&self, id: i64) -> Result<bool, RepositoryError> {
            self.with_state(|state| state.readings.remove(&id).is_some())
        }
    }
}
