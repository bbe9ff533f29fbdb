//! Configuration for migration-integrity

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::context::ExecutionContext;
use crate::db::hashes::DEFAULT_HASH_EXTRA_KEY;
use crate::entry_point::InstalledEntryPoints;
use crate::error::IntegrityError;

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("migration-integrity")
        .join("config.toml")
}

/// Profile the migrations run against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_name")]
    pub name: String,

    /// Test profiles never get audit files
    #[serde(default)]
    pub is_test_profile: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: default_profile_name(),
            is_test_profile: false,
        }
    }
}

/// An entry point installed in the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointConfig {
    /// Group, e.g. `aiida.calculations`
    pub group: String,
    /// `name = module:Class`
    pub specifier: String,
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Directory audit files are written to
    #[serde(default = "default_audit_dir")]
    pub audit_dir: PathBuf,

    /// Extras key holding cached node hashes
    #[serde(default = "default_hash_extra_key")]
    pub hash_extra_key: String,

    /// Entry points installed in addition to the core ones
    #[serde(default)]
    pub entry_points: Vec<EntryPointConfig>,
}

fn default_profile_name() -> String {
    "default".to_string()
}

fn default_audit_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_hash_extra_key() -> String {
    DEFAULT_HASH_EXTRA_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            audit_dir: default_audit_dir(),
            hash_extra_key: default_hash_extra_key(),
            entry_points: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IntegrityError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| IntegrityError::Config(e.to_string()))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IntegrityError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| IntegrityError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Context for the configured profile
    pub fn execution_context(&self) -> ExecutionContext {
        if self.profile.is_test_profile {
            ExecutionContext::ephemeral(&self.profile.name)
        } else {
            ExecutionContext::new(&self.profile.name)
        }
    }

    /// Core entry points plus the configured ones
    pub fn installed_entry_points(&self) -> Result<InstalledEntryPoints, IntegrityError> {
        let mut installed = InstalledEntryPoints::builtin()?;
        for entry in &self.entry_points {
            installed.register(&entry.group, &entry.specifier)?;
        }
        Ok(installed)
    }
}
