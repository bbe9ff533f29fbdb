//! Invalidation of cached node hashes
//!
//! Node hashes are cached in the extras of each node. When the way hashes
//! are computed changes, a migration drops the cached value so it gets
//! recomputed, and tells the operator how to trigger that.

use rusqlite::{params, Connection};
use tracing::{debug, warn};

use crate::entry_point::EntryPointLoader;
use crate::error::IntegrityError;
use crate::node_type::node_type_for_reference;

/// Extras key holding the node hash
pub const DEFAULT_HASH_EXTRA_KEY: &str = "_aiida_hash";

/// JSON path addressing a top level extras key
fn extras_key_path(key: &str) -> Result<String, IntegrityError> {
    if key.is_empty() || key.contains('"') {
        return Err(IntegrityError::Config(format!(
            "'{}' cannot be used as an extras key",
            key
        )));
    }
    Ok(format!("$.\"{}\"", key))
}

/// Drop the cached hash of nodes
///
/// `entry_point_string` narrows the reset to the nodes of one class, e.g.
/// `aiida.node:process.calculation.calcjob` for all `CalcJobNode` rows; an
/// entry point whose class matches every node leaves the reset unscoped.
/// The remediation warning is only logged when there are matching nodes.
/// Extras that are not valid JSON are left untouched.
///
/// Returns the number of matching nodes.
///
/// # Errors
///
/// Fails with [`IntegrityError::Config`] when `hash_extra_key` is empty or
/// contains `"`, since it cannot be addressed as a single extras key. Entry
/// point lookup failures and database errors are returned as they occur.
pub fn drop_hashes(
    conn: &Connection,
    loader: &dyn EntryPointLoader,
    hash_extra_key: &str,
    entry_point_string: Option<&str>,
) -> Result<u64, IntegrityError> {
    let path = extras_key_path(hash_extra_key)?;

    let node_type = match entry_point_string {
        Some(reference) => node_type_for_reference(loader, reference)?,
        None => String::new(),
    };

    let node_count: i64 = if node_type.is_empty() {
        conn.query_row("SELECT count(*) FROM db_dbnode", [], |row| row.get(0))?
    } else {
        conn.query_row(
            "SELECT count(*) FROM db_dbnode WHERE node_type = ?1",
            params![node_type],
            |row| row.get(0),
        )?
    };

    if node_count > 0 {
        match entry_point_string {
            Some(reference) => warn!(
                "Invalidating the hashes of certain nodes. Please run `verdi node rehash -e {}`.",
                reference
            ),
            None => warn!("Invalidating the hashes of all nodes. Please run `verdi node rehash`."),
        }
    }

    let updated = if node_type.is_empty() {
        conn.execute(
            "UPDATE db_dbnode SET extras = json_remove(extras, ?1) WHERE json_valid(extras)",
            params![path],
        )?
    } else {
        conn.execute(
            "UPDATE db_dbnode SET extras = json_remove(extras, ?1) WHERE node_type = ?2 AND json_valid(extras)",
            params![path, node_type],
        )?
    };

    debug!(key = hash_extra_key, node_type = %node_type, node_count, updated, "Dropped hashes");
    Ok(node_count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::nodes::{get_node, insert_node, NewNode};
    use crate::db::schema::ensure_node_table;
    use crate::entry_point::InstalledEntryPoints;
    use crate::test_support::CapturedLogs;
    use serde_json::json;

    const CALCJOB: &str = "process.calculation.calcjob.CalcJobNode.";

    fn setup() -> (Connection, InstalledEntryPoints) {
        let conn = Connection::open_in_memory().unwrap();
        ensure_node_table(&conn).unwrap();
        (conn, InstalledEntryPoints::builtin().unwrap())
    }

    fn hashed(node_type: &str) -> NewNode {
        NewNode::new(node_type)
            .with_extra(DEFAULT_HASH_EXTRA_KEY, json!("0123abcd"))
            .with_extra("keep", json!({"nested": [1, 2]}))
    }

    #[test]
    fn test_unscoped_drops_all() {
        let (conn, loader) = setup();
        let a = insert_node(&conn, &hashed(CALCJOB)).unwrap();
        let b = insert_node(&conn, &hashed("data.core.int.Int.")).unwrap();

        let logs = CapturedLogs::new();
        let count = logs
            .capture(|| drop_hashes(&conn, &loader, DEFAULT_HASH_EXTRA_KEY, None))
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(logs.warnings(), 1);
        assert!(logs.contents().contains("Please run `verdi node rehash`."));

        for id in [a, b] {
            let node = get_node(&conn, id).unwrap().unwrap();
            assert!(!node.extras.contains_key(DEFAULT_HASH_EXTRA_KEY));
            assert_eq!(node.extras["keep"], json!({"nested": [1, 2]}));
        }
    }

    #[test]
    fn test_scoped_only_touches_matching() {
        let (conn, loader) = setup();
        let calc = insert_node(&conn, &hashed(CALCJOB)).unwrap();
        let data = insert_node(&conn, &hashed("data.core.int.Int.")).unwrap();

        let logs = CapturedLogs::new();
        let count = logs
            .capture(|| {
                drop_hashes(
                    &conn,
                    &loader,
                    DEFAULT_HASH_EXTRA_KEY,
                    Some("aiida.node:process.calculation.calcjob"),
                )
            })
            .unwrap();

        assert_eq!(count, 1);
        assert!(logs
            .contents()
            .contains("Please run `verdi node rehash -e aiida.node:process.calculation.calcjob`."));

        let calc = get_node(&conn, calc).unwrap().unwrap();
        assert!(!calc.extras.contains_key(DEFAULT_HASH_EXTRA_KEY));
        assert!(calc.extras.contains_key("keep"));

        let data = get_node(&conn, data).unwrap().unwrap();
        assert_eq!(data.extras[DEFAULT_HASH_EXTRA_KEY], json!("0123abcd"));
    }

    #[test]
    fn test_zero_count_is_silent() {
        let (conn, loader) = setup();
        let data = insert_node(&conn, &hashed("data.core.int.Int.")).unwrap();

        let logs = CapturedLogs::new();
        let count = logs
            .capture(|| {
                drop_hashes(
                    &conn,
                    &loader,
                    DEFAULT_HASH_EXTRA_KEY,
                    Some("aiida.node:process.calculation.calcjob"),
                )
            })
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(logs.warnings(), 0);
        let data = get_node(&conn, data).unwrap().unwrap();
        assert!(data.extras.contains_key(DEFAULT_HASH_EXTRA_KEY));
    }

    #[test]
    fn test_empty_table_is_silent() {
        let (conn, loader) = setup();
        let logs = CapturedLogs::new();
        let count = logs
            .capture(|| drop_hashes(&conn, &loader, DEFAULT_HASH_EXTRA_KEY, None))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(logs.warnings(), 0);
    }

    #[test]
    fn test_idempotent() {
        let (conn, loader) = setup();
        let id = insert_node(&conn, &hashed(CALCJOB)).unwrap();

        drop_hashes(&conn, &loader, DEFAULT_HASH_EXTRA_KEY, None).unwrap();
        let once = get_node(&conn, id).unwrap().unwrap();
        drop_hashes(&conn, &loader, DEFAULT_HASH_EXTRA_KEY, None).unwrap();
        let twice = get_node(&conn, id).unwrap().unwrap();

        assert_eq!(once.extras, twice.extras);
    }

    #[test]
    fn test_invalid_extras_row_is_skipped() {
        let (conn, loader) = setup();
        let good = insert_node(&conn, &hashed(CALCJOB)).unwrap();
        conn.execute(
            "INSERT INTO db_dbnode (uuid, node_type, extras) VALUES ('broken', ?1, 'not json')",
            params![CALCJOB],
        )
        .unwrap();

        assert_eq!(drop_hashes(&conn, &loader, DEFAULT_HASH_EXTRA_KEY, None).unwrap(), 2);

        let good = get_node(&conn, good).unwrap().unwrap();
        assert!(!good.extras.contains_key(DEFAULT_HASH_EXTRA_KEY));
        let raw: String = conn
            .query_row("SELECT extras FROM db_dbnode WHERE uuid = 'broken'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "not json");
    }

    #[test]
    fn test_unknown_entry_point_propagates() {
        let (conn, loader) = setup();
        let result = drop_hashes(&conn, &loader, DEFAULT_HASH_EXTRA_KEY, Some("aiida.node:missing"));
        assert!(matches!(result, Err(IntegrityError::EntryPointNotFound { .. })));
    }

    #[test]
    fn test_rejects_quoted_key() {
        let (conn, loader) = setup();
        assert!(matches!(
            drop_hashes(&conn, &loader, "bad\"key", None),
            Err(IntegrityError::Config(_))
        ));
        assert!(matches!(
            drop_hashes(&conn, &loader, "", None),
            Err(IntegrityError::Config(_))
        ));
    }

    #[test]
    fn test_dotted_key_is_single_key() {
        let (conn, loader) = setup();
        let id = insert_node(
            &conn,
            &NewNode::new(CALCJOB)
                .with_extra("cache.hash", json!("x"))
                .with_extra("cache", json!({"hash": "y"})),
        )
        .unwrap();

        drop_hashes(&conn, &loader, "cache.hash", None).unwrap();

        let node = get_node(&conn, id).unwrap().unwrap();
        assert!(!node.extras.contains_key("cache.hash"));
        assert_eq!(node.extras["cache"], json!({"hash": "y"}));
    }
}
