//! Migration Integrity CLI
//!
//! Runs the integrity routines against a node database outside of a
//! migration runner, mainly for operators inspecting a database by hand.
//!
//! ## Usage
//!
//! ```bash
//! # Show the process types legacy type strings would get
//! migration-integrity infer calculation.job.quantumespresso.pw.PwCalculation.
//!
//! # Drop cached hashes of all CalcJobNode rows
//! migration-integrity drop-hashes --db nodes.db --entry-point aiida.node:process.calculation.calcjob
//!
//! # Fill in process types of legacy calculations, audit files go to ./audit
//! migration-integrity migrate-process-types --db nodes.db --audit-dir audit
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use migration_integrity::config::default_config_path;
use migration_integrity::resolver::CALCULATION_GROUP;
use migration_integrity::RegistryTier;
use migration_integrity::{
    drop_hashes, infer_calculation_entry_point, migrate_legacy_process_types, Config,
    IntegrityReporter, NodeDb, RegistrySnapshot,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "migration-integrity")]
#[command(about = "Entry point inference and integrity checks for node migrations")]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "MIGRATION_INTEGRITY_CONFIG")]
    config: Option<PathBuf>,

    /// Profile name, overrides the config file
    #[arg(long)]
    profile: Option<String>,

    /// Treat the profile as a disposable test profile
    #[arg(long)]
    test_profile: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the inferred process type of each legacy type string as JSON
    Infer {
        #[arg(required = true)]
        type_strings: Vec<String>,
    },

    /// Drop cached node hashes from extras
    DropHashes {
        /// SQLite node database
        #[arg(long)]
        db: PathBuf,

        /// Extras key of the hash, defaults to the configured one
        #[arg(long)]
        key: Option<String>,

        /// Only nodes of this entry point, e.g. aiida.node:process.calculation.calcjob
        #[arg(short, long)]
        entry_point: Option<String>,
    },

    /// Fill in process_type of legacy calculation nodes
    MigrateProcessTypes {
        /// SQLite node database
        #[arg(long)]
        db: PathBuf,

        /// Directory for audit files, defaults to the configured one
        #[arg(long)]
        audit_dir: Option<PathBuf>,
    },

    /// List the static registry snapshot
    Snapshot,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                Config::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?
            } else {
                Config::default()
            }
        }
    };

    // Apply CLI overrides
    if let Some(profile) = &args.profile {
        config.profile.name = profile.clone();
    }
    if args.test_profile {
        config.profile.is_test_profile = true;
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("migration_integrity=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let installed = config.installed_entry_points()?;
    let snapshot = RegistrySnapshot::calculations();

    info!(
        profile = %config.profile.name,
        test_profile = config.profile.is_test_profile,
        installed_calculations = installed.entry_points(CALCULATION_GROUP)?.len(),
        "Starting migration-integrity"
    );

    match args.command {
        Command::Infer { type_strings } => {
            let mapping = infer_calculation_entry_point(
                type_strings.iter().map(String::as_str),
                &installed,
                &snapshot,
            )?;
            println!("{}", serde_json::to_string_pretty(&mapping)?);
        }

        Command::DropHashes { db, key, entry_point } => {
            let db = NodeDb::open(&db)?;
            let key = key.unwrap_or_else(|| config.hash_extra_key.clone());
            let count =
                db.with_conn(|conn| drop_hashes(conn, &installed, &key, entry_point.as_deref()))?;
            info!(key = %key, nodes = count, "Hash invalidation complete");
        }

        Command::MigrateProcessTypes { db, audit_dir } => {
            let db = NodeDb::open(&db)?;
            let reporter = IntegrityReporter::new(
                config.execution_context(),
                audit_dir.unwrap_or_else(|| config.audit_dir.clone()),
            );
            let outcome = db.with_conn_mut(|conn| {
                let tx = conn.transaction()?;
                let outcome = migrate_legacy_process_types(&tx, &reporter, &installed, &snapshot)?;
                tx.commit()?;
                Ok(outcome)
            })?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            let stats = db.stats()?;
            info!(
                nodes = stats.node_count,
                legacy_calculations = stats.legacy_calculation_count,
                missing_process_type = stats.missing_process_type_count,
                "Node table after migration"
            );
        }

        Command::Snapshot => {
            println!("# {}", snapshot.group());
            for specifier in snapshot.specifiers() {
                println!("{}", specifier);
            }
        }
    }

    Ok(())
}
