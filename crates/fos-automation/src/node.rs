//! Automation Node
//!
//! A single entry of a mirrored accessibility tree. Nodes are owned by their
//! `AutomationTree`; the parent link is a back-reference by id only.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::{self, AttributeValue};
use crate::events::ListenerTable;
use crate::{NodeId, TreeId};

/// Opaque state flags copied from the host
pub type NodeState = BTreeMap<String, bool>;

/// Bounding box in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Automation tree node
#[derive(Debug)]
pub struct AutomationNode {
    pub(crate) id: NodeId,
    pub(crate) role: String,
    pub(crate) state: NodeState,
    pub(crate) location: Location,
    /// Every attribute received from the host, including hidden ones
    pub(crate) attributes_internal: HashMap<String, AttributeValue>,
    /// Public attribute names in first-seen order
    pub(crate) attribute_names: Vec<String>,
    pub(crate) child_ids: Vec<NodeId>,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) index_in_parent: usize,
    pub(crate) listeners: ListenerTable,
    /// Tree hosted by this node once linked
    pub(crate) child_tree: Option<TreeId>,
    /// Tree id requested for linking
    pub(crate) child_tree_id: Option<TreeId>,
    pub(crate) pending_child_frame: Option<bool>,
}

impl AutomationNode {
    /// Create an empty shell awaiting its descriptor
    pub(crate) fn shell(id: NodeId) -> Self {
        let mut state = NodeState::new();
        state.insert("busy".to_string(), true);
        Self {
            id,
            role: String::new(),
            state,
            location: Location::default(),
            attributes_internal: HashMap::new(),
            attribute_names: Vec::new(),
            child_ids: Vec::new(),
            parent_id: None,
            index_in_parent: 0,
            listeners: ListenerTable::new(),
            child_tree: None,
            child_tree_id: None,
            pending_child_frame: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Check a single state flag
    pub fn has_state(&self, name: &str) -> bool {
        self.state.get(name).copied().unwrap_or(false)
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn index_in_parent(&self) -> usize {
        self.index_in_parent
    }

    /// Tree hosted by this node, once the host resolved it
    pub fn child_tree(&self) -> Option<TreeId> {
        self.child_tree
    }

    /// Tree id this frame host last asked the host to resolve
    pub fn requested_child_tree(&self) -> Option<TreeId> {
        self.child_tree_id
    }

    /// Whether a child tree was requested but is not linked yet
    pub fn is_child_frame_pending(&self) -> bool {
        self.pending_child_frame == Some(true)
    }

    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerTable {
        &mut self.listeners
    }

    /// Raw attribute value, hidden names included
    pub fn raw_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes_internal.get(name)
    }

    /// Public attribute names in the order they were first received
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attribute_names.iter().map(String::as_str)
    }

    /// Store an attribute and expose its name unless it is internal-only
    pub(crate) fn set_attribute(&mut self, name: &str, value: AttributeValue) {
        self.attributes_internal.insert(name.to_string(), value);
        if !attributes::is_hidden(name) && !self.attribute_names.iter().any(|n| n == name) {
            self.attribute_names.push(name.to_string());
        }
    }

    /// Serializable snapshot of the public surface
    pub fn to_json(&self, tree_id: TreeId) -> serde_json::Value {
        let attributes: serde_json::Map<String, serde_json::Value> = self
            .attribute_names
            .iter()
            .filter_map(|name| {
                let value = self.attributes_internal.get(name)?;
                Some((name.clone(), value.to_json()))
            })
            .collect();
        serde_json::json!({
            "treeID": tree_id,
            "id": self.id,
            "role": self.role,
            "attributes": attributes,
        })
    }
}

impl fmt::Display for AutomationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent_id.unwrap_or(NodeId::UNASSIGNED);
        let child_ids: Vec<i32> = self.child_ids.iter().map(|id| id.0).collect();
        let attributes: BTreeMap<&str, serde_json::Value> = self
            .attribute_names
            .iter()
            .filter_map(|name| {
                let value = self.attributes_internal.get(name)?;
                Some((name.as_str(), value.to_json()))
            })
            .collect();
        write!(
            f,
            "node id={} role={} state={} parentID={} childIds={} attributes={}",
            self.id,
            self.role,
            serde_json::to_string(&self.state).unwrap_or_default(),
            parent,
            serde_json::to_string(&child_ids).unwrap_or_default(),
            serde_json::to_string(&attributes).unwrap_or_default(),
        )
    }
}
