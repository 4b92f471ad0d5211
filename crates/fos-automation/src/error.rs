//! Automation errors

use crate::{NodeId, TreeId};

/// Reasons an incoming tree update was rejected
///
/// The tree is left in whatever state it reached before the failing step;
/// callers should treat it as untrustworthy until the host resends it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Bad nodeIdToClear: {node_id_to_clear}")]
    MalformedUpdate { node_id_to_clear: i32 },

    #[error("Bad nodeIdToClear: {node_id} (not in cache)")]
    UnknownClearTarget { node_id: NodeId },

    #[error("{node_id} (role {role:?}) is not in the cache and not the new root")]
    UnknownNode { node_id: NodeId, role: String },

    #[error("Node {parent} has duplicate child id {child}")]
    DuplicateChild { parent: NodeId, child: NodeId },

    #[error("Node {child} reparented from {old_parent:?} to {new_parent}")]
    InvalidReparent {
        child: NodeId,
        old_parent: Option<NodeId>,
        new_parent: NodeId,
    },

    #[error("Nodes left pending by the update: {ids:?}")]
    UnresolvedPendingNodes { ids: Vec<NodeId> },
}

/// Automation client error
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("Bad update received on automation tree {tree_id}")]
    BadUpdate {
        tree_id: TreeId,
        #[source]
        source: SyncError,
    },

    #[error("{action} requires {{\"desktop\": true}} or {{\"interact\": true}} in the \"automation\" manifest key")]
    PermissionDenied { action: &'static str },

    #[error("Node {node_id} in tree {tree_id} is no longer in the tree")]
    StaleNode { tree_id: TreeId, node_id: NodeId },

    #[error("Unknown automation tree: {0}")]
    UnknownTree(TreeId),

    #[error("Invalid automation config: {0}")]
    Config(String),
}
