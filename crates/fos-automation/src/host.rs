//! Host Boundary
//!
//! The host owns the real accessibility trees. It pushes updates and events
//! in, and receives action, child tree and selector requests out.

use serde::{Deserialize, Serialize};

use crate::update::TreeUpdate;
use crate::{NodeId, TreeId};

/// Outbound side of the host connection
pub trait AutomationHost {
    /// Whether the client holds the interact (or desktop) capability
    fn is_interact_permitted(&self) -> bool;

    /// Fire-and-forget action request
    fn perform_action(&mut self, request: &ActionRequest);

    /// Start tracking the tree hosted by a frame node
    fn enable_child_tree(&mut self, child_tree: TreeId);

    /// Find a descendant of `node_id` matching `selector`
    ///
    /// Returns the matching node id; `None` or `Some(0)` mean no match.
    fn query_selector(&mut self, tree_id: TreeId, node_id: NodeId, selector: &str) -> Option<i32>;
}

/// Host that permits interaction and ignores every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl AutomationHost for NullHost {
    fn is_interact_permitted(&self) -> bool {
        true
    }

    fn perform_action(&mut self, _request: &ActionRequest) {}

    fn enable_child_tree(&mut self, _child_tree: TreeId) {}

    fn query_selector(&mut self, _tree_id: TreeId, _node_id: NodeId, _selector: &str) -> Option<i32> {
        None
    }
}

/// Action performed on a node by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "actionType", rename_all = "camelCase")]
pub enum Action {
    DoDefault,
    Focus,
    MakeVisible,
    SetSelection {
        #[serde(rename = "startIndex")]
        start_index: i32,
        #[serde(rename = "endIndex")]
        end_index: i32,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DoDefault => "doDefault",
            Self::Focus => "focus",
            Self::MakeVisible => "makeVisible",
            Self::SetSelection { .. } => "setSelection",
        }
    }
}

/// Action addressed to one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    #[serde(rename = "treeID")]
    pub tree_id: TreeId,
    #[serde(rename = "automationNodeID")]
    pub node_id: NodeId,
    #[serde(flatten)]
    pub action: Action,
}

/// Update followed by an event on one of the updated tree's nodes
#[derive(Debug, Clone, Deserialize)]
pub struct AccessibilityEventParams {
    #[serde(rename = "treeID")]
    pub tree_id: TreeId,
    #[serde(rename = "targetID")]
    pub target_id: NodeId,
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(default)]
    pub update: TreeUpdate,
}

/// Inbound message from the host
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    AccessibilityEvent(AccessibilityEventParams),
    ChildTreeResolved {
        #[serde(rename = "treeID")]
        tree_id: TreeId,
    },
    DestroyTree {
        #[serde(rename = "treeID")]
        tree_id: TreeId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_request_json() {
        let request = ActionRequest {
            tree_id: TreeId(1),
            node_id: NodeId(5),
            action: Action::SetSelection { start_index: 2, end_index: 4 },
        };
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "treeID": 1,
                "automationNodeID": 5,
                "actionType": "setSelection",
                "startIndex": 2,
                "endIndex": 4,
            })
        );

        let json = serde_json::to_value(ActionRequest {
            tree_id: TreeId(1),
            node_id: NodeId(5),
            action: Action::DoDefault,
        })
        .unwrap();
        assert_eq!(json["actionType"], "doDefault");
    }

    #[test]
    fn test_host_message_json() {
        let msg: HostMessage = serde_json::from_str(
            r#"{"type": "accessibilityEvent", "treeID": 1, "targetID": 2, "eventType": "focus",
                "update": {"nodes": [{"id": 2, "role": "rootWebArea"}]}}"#,
        )
        .unwrap();
        match msg {
            HostMessage::AccessibilityEvent(params) => {
                assert_eq!(params.tree_id, TreeId(1));
                assert_eq!(params.target_id, NodeId(2));
                assert_eq!(params.event_type, "focus");
                assert_eq!(params.update.nodes.len(), 1);
            }
            other => panic!("unexpected message {:?}", other),
        }

        let msg: HostMessage =
            serde_json::from_str(r#"{"type": "childTreeResolved", "treeID": 7}"#).unwrap();
        assert!(matches!(msg, HostMessage::ChildTreeResolved { tree_id: TreeId(7) }));

        let msg: HostMessage = serde_json::from_str(r#"{"type": "destroyTree", "treeID": 7}"#).unwrap();
        assert!(matches!(msg, HostMessage::DestroyTree { tree_id: TreeId(7) }));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Focus.name(), "focus");
        assert_eq!(Action::MakeVisible.name(), "makeVisible");
    }
}
