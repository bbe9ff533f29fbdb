//! Migration Integrity - entry point inference and integrity checks for node migrations
//!
//! Called by a migration runner at specific steps while upgrading the node
//! table of a provenance database. The runner owns the connection and the
//! ordering of steps; this crate provides the routines.
//!
//! ## Components
//!
//! - **Resolver**: maps legacy `calculation.job.*` type strings onto entry
//!   point references, using installed entry points first and a static
//!   snapshot of the public plugin registry second
//! - **Reporter**: writes records that violate an invariant to a
//!   `migration-*.log` audit file and logs where it went
//! - **Hash invalidation**: strips cached hashes from node extras, scoped to
//!   one node class or all nodes
//!
//! ## Audit file layout
//!
//! ```text
//! # 2024-01-01T12:00:00.000000
//! # Violation reason: <reason>
//! # Performed action: <action>
//!
//!   id  uuid
//! ----  ------------------------------------
//!    7  0c9d5a6e-...
//! ```

pub mod config;
pub mod context;
pub mod db;
pub mod entry_point;
pub mod error;
pub mod node_type;
pub mod reporter;
pub mod resolver;
pub mod table;

#[cfg(test)]
mod test_support;

// Re-exports
pub use config::Config;
pub use context::ExecutionContext;
pub use db::{drop_hashes, migrate_legacy_process_types, NodeDb, ProcessTypeMigration};
pub use entry_point::{
    merge_tiers, parse_entry_point, EntryPoint, EntryPointLoader, InstalledEntryPoints,
    RegistrySnapshot, RegistryTier,
};
pub use error::IntegrityError;
pub use reporter::IntegrityReporter;
pub use resolver::infer_calculation_entry_point;
