//! Integrity violation reporting
//!
//! Records that break an invariant during a migration are not fatal. They are
//! written to an audit file in the working directory for the operator to
//! review, and a warning pointing at that file is logged. Nothing is written
//! for ephemeral profiles, so test suites leave no files behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::error::IntegrityError;
use crate::table::tabulate;

/// Frame around violation warnings
pub const WARNING_BORDER: &str = "************************************************************************************************************************";

/// Audit file name prefix
pub const AUDIT_FILE_PREFIX: &str = "migration-";

/// Audit file name suffix
pub const AUDIT_FILE_SUFFIX: &str = ".log";

/// Action recorded when the caller did not take one
const DEFAULT_ACTION: &str = "nothing";

/// Writes violating records to audit files
#[derive(Debug, Clone)]
pub struct IntegrityReporter {
    context: ExecutionContext,
    audit_dir: PathBuf,
}

impl IntegrityReporter {
    pub fn new(context: ExecutionContext, audit_dir: impl Into<PathBuf>) -> Self {
        Self {
            context,
            audit_dir: audit_dir.into(),
        }
    }

    /// Reporter writing into the current working directory
    pub fn in_working_dir(context: ExecutionContext) -> Self {
        Self::new(context, ".")
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn audit_dir(&self) -> &Path {
        &self.audit_dir
    }

    /// Log an integrity violation and write the violators to a new audit file
    ///
    /// `headers` should have one entry per column of `results`, but ragged
    /// input still renders. Returns the audit file path, or `None` when the
    /// context is ephemeral and nothing was written.
    pub fn write_violation<H: AsRef<str>>(
        &self,
        results: &[Vec<Value>],
        headers: &[H],
        reason: &str,
        action: Option<&str>,
    ) -> Result<Option<PathBuf>, IntegrityError> {
        if self.context.is_ephemeral() {
            return Ok(None);
        }

        let action = action.unwrap_or(DEFAULT_ACTION);

        // Exclusive creation, an existing file is never reused
        let (mut handle, path) = tempfile::Builder::new()
            .prefix(AUDIT_FILE_PREFIX)
            .suffix(AUDIT_FILE_SUFFIX)
            .tempfile_in(&self.audit_dir)?
            .keep()
            .map_err(|e| IntegrityError::Io(e.error))?;

        warn!(
            "\n{}\nFound one or multiple records that violate the integrity of the database\nViolation reason: {}\nPerformed action: {}\nViolators written to: {}\n{}\n",
            WARNING_BORDER,
            reason,
            action,
            path.display(),
            WARNING_BORDER
        );

        writeln!(handle, "# {}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f"))?;
        writeln!(handle, "# Violation reason: {}", reason)?;
        writeln!(handle, "# Performed action: {}", action)?;
        writeln!(handle)?;
        handle.write_all(tabulate(results, headers).as_bytes())?;
        handle.flush()?;

        debug!(path = %path.display(), rows = results.len(), "Wrote audit file");
        Ok(Some(path))
    }
}
