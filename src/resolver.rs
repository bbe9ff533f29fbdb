//! Inference of calculation entry points from legacy type strings
//!
//! Before plugins were introduced the `node_type` of a calculation encoded
//! its class directly: `PwCalculation` would be stored as
//! `calculation.job.quantumespresso.pw.PwCalculation.`. Migrated nodes carry
//! a generic `node_type` and keep the plugin identity in `process_type`,
//! which should hold an entry point reference. This module maps each legacy
//! type string onto the best matching reference.

use std::collections::BTreeMap;

use tracing::debug;

use crate::entry_point::{merge_tiers, RegistryTier};
use crate::error::IntegrityError;

/// Legacy type strings of calculation jobs start with this prefix
pub const PREFIX_CALC_JOB: &str = "calculation.job.";

/// Group inferred entry points are looked up in
pub const CALCULATION_GROUP: &str = "aiida.calculations";

/// Map legacy calculation type strings to inferred process types
///
/// Known entry points are those of `local` joined with those of `snapshot`;
/// a name present in both is taken from `local`. For every type string with
/// the calculation job prefix the output holds one of:
///
/// - `aiida.calculations:<name>` when the module path is a known entry point
/// - `<module path>.<Class>` when it is not
/// - an empty string when the type string has no module path at all
///
/// Type strings without the prefix cannot reference a calculation plugin and
/// are left out of the mapping.
pub fn infer_calculation_entry_point<'a, I>(
    type_strings: I,
    local: &dyn RegistryTier,
    snapshot: &dyn RegistryTier,
) -> Result<BTreeMap<String, String>, IntegrityError>
where
    I: IntoIterator<Item = &'a str>,
{
    let known = merge_tiers(CALCULATION_GROUP, &[local, snapshot])?;

    let mut mapping = BTreeMap::new();

    for type_string in type_strings {
        let Some(plugin_string) = type_string.strip_prefix(PREFIX_CALC_JOB) else {
            continue;
        };

        let mut parts: Vec<&str> = plugin_string.split('.').filter(|p| !p.is_empty()).collect();
        let plugin_class = parts.pop().unwrap_or_default();
        let inferred_name = parts.join(".");

        let inferred = if let Some(entry_point) = known.get(&inferred_name) {
            entry_point.reference()
        } else if !inferred_name.is_empty() {
            format!("{}.{}", inferred_name, plugin_class)
        } else {
            // Only the bare `calculation.job.JobCalculation.` style strings end up here
            String::new()
        };

        debug!(type_string, inferred = %inferred, "Inferred process type");
        mapping.insert(type_string.to_string(), inferred);
    }

    Ok(mapping)
}

/// Whether an inferred process type is a resolved entry point reference
pub fn is_entry_point_reference(inferred: &str) -> bool {
    inferred
        .strip_prefix(CALCULATION_GROUP)
        .is_some_and(|rest| rest.starts_with(':'))
}
