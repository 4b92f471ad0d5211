//! Tree Synchronization
//!
//! Applies host updates to an `AutomationTree`. Each update carries node data
//! that, once applied, must leave a complete tree: every referenced child is
//! described, no id is listed twice under one parent, and no node silently
//! moves to a different parent.
//!
//! Updates are not rolled back on failure. Nodes touched before the failing
//! step keep their new state, and the caller should consider the tree
//! untrustworthy until the host resends it (e.g. with a root clear).

use std::collections::{BTreeSet, HashSet};

use crate::attributes::AttributeValue;
use crate::node::AutomationNode;
use crate::tree::AutomationTree;
use crate::update::{NodeData, TreeUpdate};
use crate::{NodeId, SyncError, TreeId};

/// Request to start tracking the tree hosted by a frame node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildTreeRequest {
    pub host: NodeId,
    pub child_tree: TreeId,
}

/// Outcome of a successfully applied update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Nodes created by the update, in creation order
    pub created: Vec<NodeId>,
    /// Nodes invalidated by the update, descendants before ancestors
    pub removed: Vec<NodeId>,
    pub old_root: Option<NodeId>,
    pub root: Option<NodeId>,
    pub child_tree_requests: Vec<ChildTreeRequest>,
}

impl ChangeSet {
    pub fn root_changed(&self) -> bool {
        self.old_root != self.root
    }
}

/// Bookkeeping scoped to a single `apply_update` call
struct UpdateState {
    /// Ids referenced by this update that still need a descriptor
    pending: BTreeSet<NodeId>,
    changes: ChangeSet,
}

impl UpdateState {
    fn new(old_root: Option<NodeId>) -> Self {
        Self {
            pending: BTreeSet::new(),
            changes: ChangeSet { old_root, ..Default::default() },
        }
    }
}

impl AutomationTree {
    /// Apply one incremental update
    pub fn apply_update(&mut self, update: &TreeUpdate) -> Result<ChangeSet, SyncError> {
        let mut state = UpdateState::new(self.root_id());

        match update.node_id_to_clear {
            clear if clear < 0 => {
                tracing::warn!("Bad nodeIdToClear: {}", clear);
                return Err(SyncError::MalformedUpdate { node_id_to_clear: clear });
            }
            0 => {}
            clear => self.clear_subtree(NodeId(clear), &mut state)?,
        }

        for data in &update.nodes {
            self.update_node(data, &mut state)?;
        }

        if !state.pending.is_empty() {
            let ids: Vec<NodeId> = state.pending.into_iter().collect();
            tracing::warn!("Nodes left pending by the update: {:?}", ids);
            return Err(SyncError::UnresolvedPendingNodes { ids });
        }

        state.changes.root = self.root_id();
        tracing::debug!(
            "Applied update to tree {}: {} created, {} removed",
            self.tree_id(),
            state.changes.created.len(),
            state.changes.removed.len()
        );
        Ok(state.changes)
    }

    fn clear_subtree(&mut self, id: NodeId, state: &mut UpdateState) -> Result<(), SyncError> {
        if self.root_id() == Some(id) {
            let removed = self.invalidate_all();
            state.changes.removed.extend(removed);
            return Ok(());
        }

        let Some(node) = self.get_mut(id) else {
            tracing::warn!("Bad nodeIdToClear: {} (not in cache)", id);
            return Err(SyncError::UnknownClearTarget { node_id: id });
        };
        let children = std::mem::take(&mut node.child_ids);
        for child in children {
            self.invalidate(child, &mut state.changes.removed);
        }
        state.pending.insert(id);
        Ok(())
    }

    fn update_node(&mut self, data: &NodeData, state: &mut UpdateState) -> Result<(), SyncError> {
        let id = NodeId(data.id);
        let mut created_root = false;

        if data.id < 0 {
            tracing::warn!("Descriptor with unassigned id {}", id);
            return Err(SyncError::UnknownNode {
                node_id: id,
                role: data.role.clone().unwrap_or_default(),
            });
        }

        if self.contains(id) {
            state.pending.remove(&id);
        } else {
            let role = data.role.as_deref().unwrap_or_default();
            if !self.config().is_root_role(role) || self.root_id().is_some() {
                tracing::warn!("{} is not in the cache and not the new root", id);
                return Err(SyncError::UnknownNode { node_id: id, role: role.to_string() });
            }
            self.insert(AutomationNode::shell(id));
            self.set_root(Some(id));
            state.changes.created.push(id);
            created_root = true;
        }

        self.set_data(id, data, state);

        let result = self.update_children(id, &data.child_ids, state);
        if created_root && matches!(result, Err(SyncError::DuplicateChild { .. })) {
            let mut removed = Vec::new();
            self.invalidate(id, &mut removed);
            state.changes.removed.extend(removed);
        }
        result
    }

    fn set_data(&mut self, id: NodeId, data: &NodeData, state: &mut UpdateState) {
        let config = self.config_arc();
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let role = data.role.clone().unwrap_or_default();

        if config.is_frame_host_role(&role) {
            if node.pending_child_frame.is_none() {
                node.pending_child_frame = Some(true);
            }
            if node.pending_child_frame == Some(true) {
                let child_tree = data
                    .int_attributes
                    .get(&config.child_tree_id_attribute)
                    .and_then(|raw| i32::try_from(*raw).ok())
                    .map(TreeId);
                match child_tree {
                    Some(child_tree) => {
                        node.child_tree_id = Some(child_tree);
                        state.changes.child_tree_requests.push(ChildTreeRequest { host: id, child_tree });
                    }
                    None => tracing::warn!(
                        "Frame host {} has no {} attribute",
                        id,
                        config.child_tree_id_attribute
                    ),
                }
            }
        }

        node.role = role;
        node.state = data.state.clone().unwrap_or_default();
        node.location = data.location.unwrap_or_default();

        for (name, value) in &data.bool_attributes {
            node.set_attribute(name, AttributeValue::Bool(*value));
        }
        for (name, value) in &data.float_attributes {
            node.set_attribute(name, AttributeValue::Float(*value));
        }
        for (name, value) in &data.html_attributes {
            node.set_attribute(name, AttributeValue::String(value.clone()));
        }
        for (name, value) in &data.int_attributes {
            node.set_attribute(name, AttributeValue::Int(*value));
        }
        for (name, value) in &data.intlist_attributes {
            node.set_attribute(name, AttributeValue::IntList(value.clone()));
        }
        for (name, value) in &data.string_attributes {
            node.set_attribute(name, AttributeValue::String(value.clone()));
        }
    }

    /// Reconcile the children of `id` against `child_ids`
    fn update_children(
        &mut self,
        id: NodeId,
        child_ids: &[i32],
        state: &mut UpdateState,
    ) -> Result<(), SyncError> {
        let new_ids: Vec<NodeId> = child_ids.iter().copied().map(NodeId).collect();

        let mut new_set = HashSet::with_capacity(new_ids.len());
        for child in &new_ids {
            if !new_set.insert(*child) {
                tracing::warn!("Node {} has duplicate child id {}", id, child);
                return Err(SyncError::DuplicateChild { parent: id, child: *child });
            }
        }

        // Delete the old children
        let old_ids = self.get(id).map(|n| n.child_ids.clone()).unwrap_or_default();
        for old in old_ids.into_iter().filter(|old| !new_set.contains(old)) {
            self.invalidate(old, &mut state.changes.removed);
        }

        // Keep or create the new children. A reparented child is left where
        // it is and the rest of the list is still applied, so this node stays
        // consistent; the error is reported once the list is done.
        let mut accepted = Vec::with_capacity(new_ids.len());
        let mut reparented = None;
        for child in new_ids {
            match self.get(child) {
                Some(existing) if existing.parent_id != Some(id) => {
                    tracing::warn!(
                        "Node {} reparented from {} to {}",
                        child,
                        existing.parent_id.unwrap_or(NodeId::UNASSIGNED),
                        id
                    );
                    reparented.get_or_insert(SyncError::InvalidReparent {
                        child,
                        old_parent: existing.parent_id,
                        new_parent: id,
                    });
                    continue;
                }
                Some(_) => {}
                None => {
                    self.insert(AutomationNode::shell(child));
                    state.pending.insert(child);
                    state.changes.created.push(child);
                }
            }
            accepted.push(child);
        }

        for (index, child) in accepted.iter().enumerate() {
            if let Some(node) = self.get_mut(*child) {
                node.index_in_parent = index;
                node.parent_id = Some(id);
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.child_ids = accepted;
        }

        match reparented {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
