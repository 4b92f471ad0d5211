//! Tree update wire records
//!
//! Transient values pushed by the host. Field names follow the host's
//! camelCase JSON so recorded updates deserialize directly.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::node::Location;

/// One incremental update for a single tree
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeUpdate {
    /// Node whose subtree is cleared before applying `nodes` (0 = none)
    pub node_id_to_clear: i32,
    /// Node descriptors, applied in order
    pub nodes: Vec<NodeData>,
}

impl TreeUpdate {
    pub fn new(nodes: Vec<NodeData>) -> Self {
        Self { node_id_to_clear: 0, nodes }
    }

    pub fn with_clear(mut self, node_id: i32) -> Self {
        self.node_id_to_clear = node_id;
        self
    }
}

/// Wire descriptor of one node
///
/// Attribute buckets are ordered maps so attributes are applied in a stable
/// order regardless of how the host serialized them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeData {
    pub id: i32,
    pub role: Option<String>,
    pub state: Option<BTreeMap<String, bool>>,
    pub location: Option<Location>,
    pub bool_attributes: BTreeMap<String, bool>,
    pub float_attributes: BTreeMap<String, f64>,
    pub html_attributes: BTreeMap<String, String>,
    pub int_attributes: BTreeMap<String, i64>,
    pub intlist_attributes: BTreeMap<String, Vec<i64>>,
    pub string_attributes: BTreeMap<String, String>,
    pub child_ids: Vec<i32>,
}

impl NodeData {
    pub fn new(id: i32, role: &str) -> Self {
        Self {
            id,
            role: Some(role.to_string()),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, child_ids: &[i32]) -> Self {
        self.child_ids = child_ids.to_vec();
        self
    }

    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.int_attributes.insert(name.to_string(), value);
        self
    }

    pub fn with_int_list(mut self, name: &str, value: &[i64]) -> Self {
        self.intlist_attributes.insert(name.to_string(), value.to_vec());
        self
    }

    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.string_attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.bool_attributes.insert(name.to_string(), value);
        self
    }

    pub fn with_state(mut self, name: &str, value: bool) -> Self {
        self.state.get_or_insert_with(BTreeMap::new).insert(name.to_string(), value);
        self
    }
}
