//! Node table layout
//!
//! The table itself belongs to the migration runner; these are the columns
//! the integrity routines read and write. `ensure_node_table` creates it for
//! standalone databases and tests.

use rusqlite::Connection;
use tracing::debug;

use crate::error::IntegrityError;

/// Node table name
pub const NODE_TABLE: &str = "db_dbnode";

const NODE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS db_dbnode (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,

    -- Class discriminator, e.g. 'process.calculation.calcjob.CalcJobNode.'
    node_type TEXT NOT NULL DEFAULT '',
    -- Entry point reference of the process that produced the node
    process_type TEXT,

    label TEXT NOT NULL DEFAULT '',

    -- Schema-less JSON side data
    extras TEXT NOT NULL DEFAULT '{}',

    ctime TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_dbnode_node_type ON db_dbnode(node_type);
CREATE INDEX IF NOT EXISTS idx_dbnode_process_type ON db_dbnode(process_type);
"#;

/// Create the node table if it does not exist
pub fn ensure_node_table(conn: &Connection) -> Result<(), IntegrityError> {
    debug!("Ensuring {} table", NODE_TABLE);
    conn.execute_batch(NODE_SCHEMA)?;
    Ok(())
}
