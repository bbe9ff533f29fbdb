//! Integration tests for the migration step routines
//!
//! These run the resolver, reporter and hash invalidation the way a
//! migration runner would, against an in-memory node database.

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use migration_integrity::db::nodes::{get_node, insert_node, NewNode};
use migration_integrity::db::hashes::DEFAULT_HASH_EXTRA_KEY;
use migration_integrity::{
    drop_hashes, infer_calculation_entry_point, migrate_legacy_process_types, ExecutionContext,
    InstalledEntryPoints, IntegrityReporter, NodeDb, RegistrySnapshot,
};
use serde_json::json;
use tempfile::TempDir;

/// Log buffer shared with a scoped subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_example_mapping() {
    let snapshot = RegistrySnapshot::new(
        "aiida.calculations",
        ["quantumespresso.pw = aiida_quantumespresso.calculations.pw:PwCalculation"],
    );
    let mapping = infer_calculation_entry_point(
        ["calculation.job.quantumespresso.pw.PwCalculation."],
        &InstalledEntryPoints::new(),
        &snapshot,
    )
    .unwrap();

    assert_eq!(mapping.len(), 1);
    assert_eq!(
        mapping.get("calculation.job.quantumespresso.pw.PwCalculation.").map(String::as_str),
        Some("aiida.calculations:quantumespresso.pw")
    );
}

#[test]
fn test_every_prefixed_string_is_mapped() {
    let inputs = [
        "calculation.job.",
        "calculation.job.JobCalculation.",
        "calculation.job.quantumespresso.pw.PwCalculation.",
        "calculation.job.vasp.vasp.VaspCalculation.",
        "calculation.job.nothing.known.here.SomeCalculation.",
        "calculation.job.trailing.Separators...",
        "calculation.inline.InlineCalculation.",
        "calculation.function.FunctionCalculation.",
        "data.Data.",
        "",
    ];
    let local = InstalledEntryPoints::builtin().unwrap();
    let mapping =
        infer_calculation_entry_point(inputs, &local, &RegistrySnapshot::calculations()).unwrap();

    for input in inputs {
        assert_eq!(
            mapping.contains_key(input),
            input.starts_with("calculation.job."),
            "unexpected membership for {:?}",
            input
        );
    }
    assert_eq!(mapping["calculation.job.trailing.Separators..."], "trailing.Separators");
    assert_eq!(
        mapping["calculation.job.nothing.known.here.SomeCalculation."],
        "nothing.known.here.SomeCalculation"
    );
}

#[test]
fn test_ephemeral_reporter_is_silent() {
    let dir = TempDir::new().unwrap();
    let reporter = IntegrityReporter::new(ExecutionContext::ephemeral("test"), dir.path());
    let logs = LogBuffer::default();

    let result = logs
        .capture(|| {
            reporter.write_violation(
                &[vec![json!(1), json!("uuid")], vec![json!("ragged")]],
                &["id", "uuid"],
                "reason",
                Some("action"),
            )
        })
        .unwrap();

    assert!(result.is_none());
    assert_eq!(file_count(dir.path()), 0);
    assert!(logs.contents().is_empty());
}

#[test]
fn test_reporter_logs_path() {
    let dir = TempDir::new().unwrap();
    let reporter = IntegrityReporter::new(ExecutionContext::new("main"), dir.path());
    let logs = LogBuffer::default();

    let path = logs
        .capture(|| reporter.write_violation(&[vec![json!(1)]], &["id"], "duplicate uuids", None))
        .unwrap()
        .unwrap();

    let contents = logs.contents();
    assert!(contents.contains("Violation reason: duplicate uuids"));
    assert!(contents.contains("Performed action: nothing"));
    assert!(contents.contains(&path.display().to_string()));
    assert_eq!(file_count(dir.path()), 1);
}

#[test]
fn test_migration_then_hash_reset() {
    let dir = TempDir::new().unwrap();
    let db = NodeDb::open_in_memory().unwrap();
    let installed = InstalledEntryPoints::builtin().unwrap();
    let reporter = IntegrityReporter::new(ExecutionContext::new("main"), dir.path());

    let (pw, unknown, calcjob, data) = db
        .with_conn(|conn| {
            let pw = insert_node(
                conn,
                &NewNode::new("calculation.job.quantumespresso.pw.PwCalculation."),
            )?;
            let unknown = insert_node(
                conn,
                &NewNode::new("calculation.job.unknown.UnknownCalculation."),
            )?;
            let calcjob = insert_node(
                conn,
                &NewNode::new("process.calculation.calcjob.CalcJobNode.")
                    .with_extra(DEFAULT_HASH_EXTRA_KEY, json!("abc"))
                    .with_extra("label_hint", json!("keep me")),
            )?;
            let data = insert_node(
                conn,
                &NewNode::new("data.core.int.Int.").with_extra(DEFAULT_HASH_EXTRA_KEY, json!("def")),
            )?;
            Ok((pw, unknown, calcjob, data))
        })
        .unwrap();

    let outcome = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let outcome =
                migrate_legacy_process_types(&tx, &reporter, &installed, &RegistrySnapshot::calculations())?;
            tx.commit()?;
            Ok(outcome)
        })
        .unwrap();

    assert_eq!(outcome.type_strings, 2);
    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.violators, 1);
    assert_eq!(file_count(dir.path()), 1);

    let stats = db.stats().unwrap();
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.legacy_calculation_count, 2);
    assert_eq!(stats.missing_process_type_count, 2);

    db.with_conn(|conn| {
        assert_eq!(
            get_node(conn, pw)?.unwrap().process_type.as_deref(),
            Some("aiida.calculations:quantumespresso.pw")
        );
        assert_eq!(
            get_node(conn, unknown)?.unwrap().process_type.as_deref(),
            Some("unknown.UnknownCalculation")
        );
        Ok(())
    })
    .unwrap();

    let logs = LogBuffer::default();
    let count = logs
        .capture(|| {
            db.with_conn(|conn| {
                drop_hashes(
                    conn,
                    &installed,
                    DEFAULT_HASH_EXTRA_KEY,
                    Some("aiida.node:process.calculation.calcjob"),
                )
            })
        })
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(logs.contents().matches("verdi node rehash -e").count(), 1);

    db.with_conn(|conn| {
        let calcjob = get_node(conn, calcjob)?.unwrap();
        assert!(!calcjob.extras.contains_key(DEFAULT_HASH_EXTRA_KEY));
        assert_eq!(calcjob.extras["label_hint"], json!("keep me"));

        let data = get_node(conn, data)?.unwrap();
        assert_eq!(data.extras[DEFAULT_HASH_EXTRA_KEY], json!("def"));
        Ok(())
    })
    .unwrap();

    // Second run finds nothing to write and leaves the audit trail alone
    let again = db
        .with_conn(|conn| {
            migrate_legacy_process_types(conn, &reporter, &installed, &RegistrySnapshot::calculations())
        })
        .unwrap();
    assert_eq!(again.updated, 0);
    assert_eq!(again.violators, 0);
    assert_eq!(file_count(dir.path()), 1);
}
