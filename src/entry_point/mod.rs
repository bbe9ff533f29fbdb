//! Entry point registry tiers
//!
//! Plugins are identified by `(group, name)` pairs declared through
//! `name = module:Class` specifiers. Two tiers provide them:
//!
//! - [`InstalledEntryPoints`] - what the running environment has installed
//! - [`RegistrySnapshot`] - a fixed copy of the public plugin registry
//!
//! [`merge_tiers`] combines tiers in precedence order; the first tier that
//! declares a name owns it.

pub mod snapshot;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IntegrityError;

/// A plugin declared in some entry point group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    pub group: String,
    pub name: String,
    /// Module path the object lives in
    pub module: String,
    /// Object inside the module, usually a class name
    pub attr: Option<String>,
}

impl EntryPoint {
    /// Fully qualified `group:name` reference
    pub fn reference(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.attr {
            Some(attr) => write!(f, "{} = {}:{}", self.name, self.module, attr),
            None => write!(f, "{} = {}", self.name, self.module),
        }
    }
}

fn is_dotted_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'))
}

/// Parse a `name = module[:attr]` specifier for `group`
///
/// Whitespace around `=` and `:` is tolerated, registry data is not
/// consistent about it.
pub fn parse_entry_point(group: &str, specifier: &str) -> Result<EntryPoint, IntegrityError> {
    let parse_error = |reason: &str| IntegrityError::EntryPointParse {
        group: group.to_string(),
        specifier: specifier.to_string(),
        reason: reason.to_string(),
    };

    let (name, value) = specifier
        .split_once('=')
        .ok_or_else(|| parse_error("missing '='"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(parse_error("empty name"));
    }

    let (module, attr) = match value.split_once(':') {
        Some((module, attr)) => (module.trim(), Some(attr.trim())),
        None => (value.trim(), None),
    };

    if !is_dotted_identifier(module) {
        return Err(parse_error("module is not a dotted identifier"));
    }
    if let Some(attr) = attr {
        if !is_dotted_identifier(attr) {
            return Err(parse_error("attribute is not a dotted identifier"));
        }
    }

    Ok(EntryPoint {
        group: group.to_string(),
        name: name.to_string(),
        module: module.to_string(),
        attr: attr.map(str::to_string),
    })
}

/// Split a `group:name` reference
pub fn parse_reference(reference: &str) -> Result<(&str, &str), IntegrityError> {
    match reference.split_once(':') {
        Some((group, name)) if !group.is_empty() && !name.is_empty() => Ok((group, name)),
        _ => Err(IntegrityError::InvalidReference(format!(
            "'{}' is not of the form '<group>:<name>'",
            reference
        ))),
    }
}

/// A source of entry points for a group
pub trait RegistryTier {
    /// All entry points this tier knows for `group`
    fn entry_points(&self, group: &str) -> Result<Vec<EntryPoint>, IntegrityError>;
}

/// Resolves `group:name` references to the object they point at
pub trait EntryPointLoader {
    fn load_entry_point_from_string(&self, reference: &str) -> Result<EntryPoint, IntegrityError>;
}

/// Core node and data classes every environment provides
const BUILTIN_ENTRY_POINTS: &[(&str, &str)] = &[
    ("aiida.node", "data = aiida.orm.nodes.data.data:Data"),
    ("aiida.node", "process = aiida.orm.nodes.process.process:ProcessNode"),
    ("aiida.node", "process.calculation = aiida.orm.nodes.process.calculation.calculation:CalculationNode"),
    ("aiida.node", "process.calculation.calcfunction = aiida.orm.nodes.process.calculation.calcfunction:CalcFunctionNode"),
    ("aiida.node", "process.calculation.calcjob = aiida.orm.nodes.process.calculation.calcjob:CalcJobNode"),
    ("aiida.node", "process.workflow = aiida.orm.nodes.process.workflow.workflow:WorkflowNode"),
    ("aiida.node", "process.workflow.workchain = aiida.orm.nodes.process.workflow.workchain:WorkChainNode"),
    ("aiida.node", "process.workflow.workfunction = aiida.orm.nodes.process.workflow.workfunction:WorkFunctionNode"),
    ("aiida.data", "core.array = aiida.orm.nodes.data.array.array:ArrayData"),
    ("aiida.data", "core.bool = aiida.orm.nodes.data.bool:Bool"),
    ("aiida.data", "core.dict = aiida.orm.nodes.data.dict:Dict"),
    ("aiida.data", "core.float = aiida.orm.nodes.data.float:Float"),
    ("aiida.data", "core.int = aiida.orm.nodes.data.int:Int"),
    ("aiida.data", "core.str = aiida.orm.nodes.data.str:Str"),
    ("aiida.data", "core.structure = aiida.orm.nodes.data.structure:StructureData"),
    ("aiida.calculations", "core.arithmetic.add = aiida.calculations.arithmetic.add:ArithmeticAddCalculation"),
    ("aiida.calculations", "core.templatereplacer = aiida.calculations.templatereplacer:TemplatereplacerCalculation"),
    ("aiida.calculations", "core.transfer = aiida.calculations.transfer:TransferCalculation"),
];

/// Entry points installed in the current environment
#[derive(Debug, Clone, Default)]
pub struct InstalledEntryPoints {
    entries: Vec<EntryPoint>,
}

impl InstalledEntryPoints {
    /// Empty tier, nothing installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Tier holding the core node, data and calculation classes
    pub fn builtin() -> Result<Self, IntegrityError> {
        let mut installed = Self::new();
        for (group, specifier) in BUILTIN_ENTRY_POINTS {
            installed.register(group, specifier)?;
        }
        Ok(installed)
    }

    /// Parse and add a specifier. A later registration of the same
    /// `(group, name)` replaces the earlier one.
    pub fn register(&mut self, group: &str, specifier: &str) -> Result<(), IntegrityError> {
        let entry_point = parse_entry_point(group, specifier)?;
        self.insert(entry_point);
        Ok(())
    }

    pub fn insert(&mut self, entry_point: EntryPoint) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|ep| ep.group == entry_point.group && ep.name == entry_point.name)
        {
            *existing = entry_point;
        } else {
            self.entries.push(entry_point);
        }
    }
}

impl RegistryTier for InstalledEntryPoints {
    fn entry_points(&self, group: &str) -> Result<Vec<EntryPoint>, IntegrityError> {
        Ok(self
            .entries
            .iter()
            .filter(|ep| ep.group == group)
            .cloned()
            .collect())
    }
}

impl EntryPointLoader for InstalledEntryPoints {
    fn load_entry_point_from_string(&self, reference: &str) -> Result<EntryPoint, IntegrityError> {
        let (group, name) = parse_reference(reference)?;

        let entry_point = self
            .entries
            .iter()
            .find(|ep| ep.group == group && ep.name == name)
            .ok_or_else(|| IntegrityError::EntryPointNotFound {
                group: group.to_string(),
                name: name.to_string(),
            })?;

        if entry_point.attr.is_none() {
            return Err(IntegrityError::InvalidReference(format!(
                "'{}' points at module {} rather than a class",
                reference, entry_point.module
            )));
        }

        debug!(reference, module = %entry_point.module, "Loaded entry point");
        Ok(entry_point.clone())
    }
}

/// Fixed list of specifiers for a single group
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    group: String,
    specifiers: Vec<String>,
}

impl RegistrySnapshot {
    pub fn new<I, S>(group: impl Into<String>, specifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group: group.into(),
            specifiers: specifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// The embedded `aiida.calculations` registry snapshot
    pub fn calculations() -> Self {
        Self::new(
            snapshot::SNAPSHOT_GROUP,
            snapshot::REGISTERED_CALCULATION_ENTRY_POINTS.iter().copied(),
        )
    }

    /// A snapshot that contributes nothing
    pub fn empty(group: impl Into<String>) -> Self {
        Self::new(group, Vec::<String>::new())
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn specifiers(&self) -> &[String] {
        &self.specifiers
    }
}

impl RegistryTier for RegistrySnapshot {
    fn entry_points(&self, group: &str) -> Result<Vec<EntryPoint>, IntegrityError> {
        if group != self.group {
            return Ok(Vec::new());
        }
        self.specifiers
            .iter()
            .map(|specifier| parse_entry_point(group, specifier))
            .collect()
    }
}

/// Merge tiers for `group`, highest precedence first
///
/// A name is taken from the first tier declaring it; later tiers only add
/// names not seen yet.
pub fn merge_tiers(
    group: &str,
    tiers: &[&dyn RegistryTier],
) -> Result<BTreeMap<String, EntryPoint>, IntegrityError> {
    let mut merged = BTreeMap::new();

    for tier in tiers {
        for entry_point in tier.entry_points(group)? {
            merged.entry(entry_point.name.clone()).or_insert(entry_point);
        }
    }

    Ok(merged)
}
