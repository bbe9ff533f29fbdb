//! SQLite access to the node table
//!
//! Migration steps receive a live connection from the runner. [`NodeDb`]
//! wraps one for the CLI and for tests; the routines in the submodules only
//! need a `&Connection`.
//!
//! ## Columns used
//!
//! - `node_type` - class discriminator, scoped by [`hashes::drop_hashes`]
//! - `process_type` - written by [`process_types::migrate_legacy_process_types`]
//! - `extras` - JSON side data, keys removed with `json_remove`

pub mod hashes;
pub mod nodes;
pub mod process_types;
pub mod schema;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::IntegrityError;

/// Node database handle
pub struct NodeDb {
    conn: Mutex<Connection>,
}

impl NodeDb {
    /// Open an existing database, creating the node table if missing
    pub fn open(db_path: &Path) -> Result<Self, IntegrityError> {
        info!("Opening SQLite database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(schema::ensure_node_table)?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, IntegrityError> {
        debug!("Opening in-memory SQLite database");

        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(schema::ensure_node_table)?;

        Ok(db)
    }

    /// Run `f` with the connection
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, IntegrityError>
    where
        F: FnOnce(&Connection) -> Result<T, IntegrityError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| IntegrityError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Run `f` with exclusive access, e.g. to open a transaction
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, IntegrityError>
    where
        F: FnOnce(&mut Connection) -> Result<T, IntegrityError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| IntegrityError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&mut conn)
    }

    /// Node counts
    pub fn stats(&self) -> Result<DbStats, IntegrityError> {
        self.with_conn(|conn| {
            let node_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM db_dbnode", [], |row| row.get(0))?;

            let legacy_calculation_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM db_dbnode WHERE substr(node_type, 1, length(?1)) = ?1",
                [crate::resolver::PREFIX_CALC_JOB],
                |row| row.get(0),
            )?;

            let missing_process_type_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM db_dbnode WHERE process_type IS NULL",
                [],
                |row| row.get(0),
            )?;

            Ok(DbStats {
                node_count: node_count as u64,
                legacy_calculation_count: legacy_calculation_count as u64,
                missing_process_type_count: missing_process_type_count as u64,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub node_count: u64,
    pub legacy_calculation_count: u64,
    pub missing_process_type_count: u64,
}

pub use hashes::drop_hashes;
pub use nodes::{NewNode, NodeRow};
pub use process_types::{migrate_legacy_process_types, ProcessTypeMigration};
