//! fOS Automation - Accessibility tree client
//!
//! Mirrors accessibility trees pushed by the host as incremental updates.
//!
//! Features:
//! - Arena node store with generation-checked weak handles
//! - Incremental update synchronization (clear, reparent and duplicate checks)
//! - Capture / target / bubble event dispatch across linked trees
//! - Child tree linking for frame-hosting nodes
//! - Id-reference attribute resolution

mod attributes;
mod automation;
mod config;
mod error;
mod events;
mod generation;
mod host;
mod linker;
mod node;
mod sync;
mod tree;
mod update;

pub use attributes::{Attribute, AttributeValue, HIDDEN_ATTRIBUTES, ID_REFERENCE_ATTRIBUTES};
pub use automation::Automation;
pub use config::AutomationConfig;
pub use error::{AutomationError, SyncError};
pub use events::{
    event_type, AutomationEvent, EventCallback, EventPhase, ListenerFailure, ListenerId,
    ListenerTable,
};
pub use generation::Generation;
pub use host::{
    AccessibilityEventParams, Action, ActionRequest, AutomationHost, HostMessage, NullHost,
};
pub use linker::ChildTreeLinker;
pub use node::{AutomationNode, Location, NodeState};
pub use sync::{ChangeSet, ChildTreeRequest};
pub use tree::{AutomationTree, NodeRef};
pub use update::{NodeData, TreeUpdate};

use serde::{Deserialize, Serialize};

/// Host-assigned node identifier, unique within one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i32);

impl NodeId {
    /// Id of a node that has not been assigned by the host yet
    pub const UNASSIGNED: NodeId = NodeId(-1);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-assigned accessibility tree identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(pub i32);

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
