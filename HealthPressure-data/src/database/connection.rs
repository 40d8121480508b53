//! Database connection module for the HealthPressure record store
//!
//! Pools are built explicitly from a [`DatabaseConfig`] and handed to the
//! store that owns them; there is no process-wide pool.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use super::migrations::run_sqlite_migrations;
use super::DatabaseError;

/// Path value that selects an in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Default location of the SQLite file
pub const DEFAULT_SQLITE_PATH: &str = "./data/healthpressure.db";

/// Shared SQLite connection pool
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// Pooled SQLite connection
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, `None` or `:memory:` for an in-memory database
    pub sqlite_path: Option<String>,
    /// Maximum number of connections (forced to 1 for in-memory databases)
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: Some(DEFAULT_SQLITE_PATH.to_string()),
            max_connections: 4,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            sqlite_path: None,
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Configuration for a database file at `path`
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            sqlite_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Create a new database configuration from environment variables
    ///
    /// - `DB_SQLITE_PATH`: database file, or `:memory:`
    /// - `DB_MAX_CONNECTIONS`: pool size
    /// - `DB_TIMEOUT_SECONDS`: connection checkout timeout
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let sqlite_path = match env::var("DB_SQLITE_PATH") {
            Ok(path) if path.trim().is_empty() => {
                return Err(DatabaseError::ConfigError("DB_SQLITE_PATH is empty".to_string()));
            }
            Ok(path) => Some(path),
            Err(_) => {
                info!("No DB_SQLITE_PATH provided, will use default path: {}", DEFAULT_SQLITE_PATH);
                defaults.sqlite_path
            }
        };

        let max_connections = parse_env_var("DB_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections);
        let timeout_seconds = parse_env_var("DB_TIMEOUT_SECONDS")?.unwrap_or(defaults.timeout_seconds);

        if max_connections == 0 {
            return Err(DatabaseError::ConfigError("DB_MAX_CONNECTIONS must be at least 1".to_string()));
        }

        info!("Database configuration: max_connections={}, timeout={}s", max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }

    /// Whether this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        match self.sqlite_path.as_deref() {
            None => true,
            Some(path) => path == IN_MEMORY_PATH,
        }
    }
}

fn parse_env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, DatabaseError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DatabaseError::InvalidEnvVar { name: name.to_string(), value }),
        Err(_) => Ok(None),
    }
}

/// Per-connection setup run by the pool on every new connection.
///
/// Bundled SQLite enforces foreign keys by default. Readings may reference
/// a person that does not exist, so enforcement is switched off here and
/// the person cascade is done by hand in a transaction.
pub fn configure_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")
}

/// Open a connection pool for `config` and run migrations on it
pub fn open_database_pool(config: &DatabaseConfig) -> Result<Arc<SqlitePool>, DatabaseError> {
    let pool = if config.is_in_memory() {
        initialize_in_memory_sqlite_pool(config)?
    } else {
        initialize_sqlite_pool(config)?
    };

    let conn = pool.get()?;
    run_sqlite_migrations(&conn)?;

    Ok(Arc::new(pool))
}

/// Initialize SQLite connection pool backed by a file
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let sqlite_path = config
        .sqlite_path
        .clone()
        .ok_or_else(|| DatabaseError::ConfigError("missing SQLite path".to_string()))?;

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(configure_connection);

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    info!("SQLite connection pool created successfully");
    Ok(pool)
}

/// Initialize an in-memory SQLite database.
///
/// Every in-memory connection is a separate database, so the pool holds
/// exactly one connection.
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = SqliteConnectionManager::memory().with_init(configure_connection);

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    Ok(pool)
}
