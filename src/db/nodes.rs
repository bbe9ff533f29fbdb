//! Node rows

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::IntegrityError;

/// Node row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: i64,
    pub uuid: String,
    pub node_type: String,
    pub process_type: Option<String>,
    pub label: String,
    pub extras: Map<String, Value>,
}

impl NodeRow {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let extras: Value = row.get("extras")?;
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            node_type: row.get("node_type")?,
            process_type: row.get("process_type")?,
            label: row.get("label")?,
            extras: match extras {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        })
    }
}

/// Input for creating a node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewNode {
    #[serde(default)]
    pub uuid: Option<String>,
    pub node_type: String,
    #[serde(default)]
    pub process_type: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub extras: Map<String, Value>,
}

impl NewNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    pub fn with_process_type(mut self, process_type: impl Into<String>) -> Self {
        self.process_type = Some(process_type.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }
}

/// Insert a node, returning its id
pub fn insert_node(conn: &Connection, node: &NewNode) -> Result<i64, IntegrityError> {
    let uuid = node
        .uuid
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let extras = serde_json::to_string(&node.extras)?;

    conn.execute(
        "INSERT INTO db_dbnode (uuid, node_type, process_type, label, extras) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![uuid, node.node_type, node.process_type, node.label, extras],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Get node by id
pub fn get_node(conn: &Connection, id: i64) -> Result<Option<NodeRow>, IntegrityError> {
    let node = conn
        .query_row(
            "SELECT id, uuid, node_type, process_type, label, extras FROM db_dbnode WHERE id = ?1",
            params![id],
            |row| NodeRow::from_row(row),
        )
        .optional()?;
    Ok(node)
}
