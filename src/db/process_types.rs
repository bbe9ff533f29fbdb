//! Legacy calculation process types
//!
//! Calculations stored before plugins were introduced have a `node_type`
//! like `calculation.job.quantumespresso.pw.PwCalculation.` and no
//! `process_type`. This step infers the entry point for each such type and
//! fills in `process_type`. Nodes whose type could not be matched to a known
//! entry point still get the fallback value, and are reported as integrity
//! violations so the operator can review them.

use std::path::PathBuf;

use rusqlite::{params, Connection};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::entry_point::RegistryTier;
use crate::error::IntegrityError;
use crate::reporter::IntegrityReporter;
use crate::resolver::{infer_calculation_entry_point, is_entry_point_reference, PREFIX_CALC_JOB};

/// Audit file headers for unresolved calculations
pub const VIOLATION_HEADERS: [&str; 4] = ["id", "uuid", "type (old)", "process_type (new)"];

const VIOLATION_REASON: &str =
    "detected calculation nodes whose type string could not be mapped onto a known entry point";

const VIOLATION_ACTION: &str =
    "set the process_type of these nodes to a fallback inferred from the type string";

/// Outcome of [`migrate_legacy_process_types`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessTypeMigration {
    /// Distinct legacy type strings found
    pub type_strings: usize,
    /// Nodes whose `process_type` was written
    pub updated: u64,
    /// Nodes that only received a fallback process type
    pub violators: usize,
    /// Audit file listing the violators, if one was written
    pub audit_file: Option<PathBuf>,
}

fn legacy_type_strings(conn: &Connection) -> Result<Vec<String>, IntegrityError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT node_type FROM db_dbnode WHERE substr(node_type, 1, length(?1)) = ?1 ORDER BY node_type",
    )?;
    let rows = stmt
        .query_map(params![PREFIX_CALC_JOB], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(rows)
}

fn violating_rows(
    conn: &Connection,
    node_type: &str,
    process_type: &str,
) -> Result<Vec<Vec<Value>>, IntegrityError> {
    let mut stmt = conn.prepare(
        "SELECT id, uuid FROM db_dbnode WHERE node_type = ?1 AND process_type IS NULL ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![node_type], |row| {
            let id: i64 = row.get(0)?;
            let uuid: String = row.get(1)?;
            Ok(vec![json!(id), json!(uuid), json!(node_type), json!(process_type)])
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Fill in `process_type` for legacy calculation nodes
///
/// Only nodes without a `process_type` are written, so running the step
/// again changes nothing. Unresolved nodes written by this run are passed to
/// `reporter`; nodes that already had a `process_type` are neither changed
/// nor reported.
pub fn migrate_legacy_process_types(
    conn: &Connection,
    reporter: &IntegrityReporter,
    local: &dyn RegistryTier,
    snapshot: &dyn RegistryTier,
) -> Result<ProcessTypeMigration, IntegrityError> {
    let type_strings = legacy_type_strings(conn)?;
    let mapping =
        infer_calculation_entry_point(type_strings.iter().map(String::as_str), local, snapshot)?;

    let mut outcome = ProcessTypeMigration {
        type_strings: type_strings.len(),
        ..Default::default()
    };
    let mut violators = Vec::new();

    for (type_string, process_type) in &mapping {
        // Collected before the update, with the same filter, so only rows
        // that are about to receive the fallback are reported
        if !is_entry_point_reference(process_type) {
            violators.extend(violating_rows(conn, type_string, process_type)?);
        }

        let changed = conn.execute(
            "UPDATE db_dbnode SET process_type = ?1 WHERE node_type = ?2 AND process_type IS NULL",
            params![process_type, type_string],
        )?;
        outcome.updated += changed as u64;
    }

    outcome.violators = violators.len();
    if !violators.is_empty() {
        outcome.audit_file = reporter.write_violation(
            &violators,
            &VIOLATION_HEADERS,
            VIOLATION_REASON,
            Some(VIOLATION_ACTION),
        )?;
    }

    info!(
        type_strings = outcome.type_strings,
        updated = outcome.updated,
        violators = outcome.violators,
        "Migrated legacy process types"
    );

    Ok(outcome)
}
