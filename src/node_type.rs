//! Node type discriminators
//!
//! The `node_type` column stores a dotted string derived from the class of
//! the node, e.g. `process.calculation.calcjob.CalcJobNode.`. These helpers
//! derive that string from an entry point.

use crate::entry_point::{EntryPoint, EntryPointLoader};
use crate::error::IntegrityError;

/// Prefix stripped from internal node classes
const INTERNAL_NODE_PREFIX: &str = "aiida.orm.nodes.";

/// Type string of the base node class, which matches every node
const BASE_NODE_TYPE: &str = "node.Node.";

/// Module base path that the classes of an entry point group live under
pub fn group_module_base_path(group: &str) -> Option<&'static str> {
    match group {
        "aiida.calculations" => Some("aiida.orm.nodes.process.calculation.calcjob"),
        "aiida.cmdline.data" => Some("aiida.cmdline.data"),
        "aiida.data" => Some("aiida.orm.nodes.data"),
        "aiida.groups" => Some("aiida.orm.groups"),
        "aiida.node" => Some("aiida.orm.nodes"),
        "aiida.parsers" => Some("aiida.parsers.plugins"),
        "aiida.schedulers" => Some("aiida.schedulers.plugins"),
        "aiida.tools.dbexporters" => Some("aiida.tools.dbexporters"),
        "aiida.tools.dbimporters" => Some("aiida.tools.dbimporters.plugins"),
        "aiida.transports" => Some("aiida.transports.plugins"),
        "aiida.workflows" => Some("aiida.workflows"),
        _ => None,
    }
}

/// Node type string for the class an entry point declares
///
/// Returns an empty string for the base node class; an empty discriminator
/// matches every node.
pub fn type_string_from_class(entry_point: &EntryPoint) -> String {
    let class_name = entry_point.attr.as_deref().unwrap_or_default();

    let type_string = match group_module_base_path(&entry_point.group) {
        Some(base) => format!("{}.{}.{}.", base, entry_point.name, class_name),
        None => format!("{}.{}.", entry_point.module, class_name),
    };

    let type_string = type_string
        .strip_prefix(INTERNAL_NODE_PREFIX)
        .map(str::to_string)
        .unwrap_or(type_string);

    if type_string == BASE_NODE_TYPE {
        String::new()
    } else {
        type_string
    }
}

/// Load `reference` and derive the node type of the class it names
pub fn node_type_for_reference(
    loader: &dyn EntryPointLoader,
    reference: &str,
) -> Result<String, IntegrityError> {
    let entry_point = loader.load_entry_point_from_string(reference)?;
    Ok(type_string_from_class(&entry_point))
}
