//! Append-only storage of form submissions in SQLite.

use bodyfat::serving::{Measurements, MEASUREMENT_FIELDS};
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Table receiving one row per submission.
pub const USER_TABLE: &str = "user_info";

#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened or refused a write.
    #[error("database unreachable at {location}: {source}")]
    Unreachable {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Handle to the submissions database. Cloning shares the connection.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("location", &self.location)
            .finish()
    }
}

impl UserStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let location = path.display().to_string();
        let conn = Connection::open(path).map_err(|source| {
            error!("Failed to open the database at {}", location);
            StorageError::Unreachable {
                location: location.clone(),
                source,
            }
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let location = ":memory:".to_string();
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Unreachable {
            location: location.clone(),
            source,
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Creates the submissions table if it does not exist.
    pub fn create_schema(&self) -> Result<(), StorageError> {
        let columns: Vec<String> = MEASUREMENT_FIELDS
            .iter()
            .map(|(field, _)| format!("{field} REAL NOT NULL"))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {USER_TABLE} (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             name TEXT NOT NULL, {})",
            columns.join(", ")
        );
        self.conn.lock().execute(&sql, [])?;
        info!("Database created at {}", self.location);
        Ok(())
    }

    /// Appends one submission and returns its generated id.
    pub fn add_user(&self, name: &str, measurements: &Measurements) -> Result<i64, StorageError> {
        let fields: Vec<&str> = MEASUREMENT_FIELDS.iter().map(|(field, _)| *field).collect();
        let placeholders = vec!["?"; fields.len() + 1].join(", ");
        let sql = format!(
            "INSERT INTO {USER_TABLE} (name, {}) VALUES ({})",
            fields.join(", "),
            placeholders
        );

        let mut values = vec![Value::Text(name.to_string())];
        values.extend(measurements.to_array().into_iter().map(Value::Real));

        let conn = self.conn.lock();
        conn.execute(&sql, params_from_iter(values))
            .map_err(|source| {
                error!("Not able to add user input to the database {}", self.location);
                StorageError::Unreachable {
                    location: self.location.clone(),
                    source,
                }
            })?;
        let id = conn.last_insert_rowid();
        info!("The user's body measurement information is added to database");
        Ok(id)
    }

    /// Number of stored submissions.
    pub fn count(&self) -> Result<usize, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {USER_TABLE}");
        let n: i64 = self.conn.lock().query_row(&sql, [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
