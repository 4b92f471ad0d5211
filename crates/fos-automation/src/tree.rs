//! Automation Tree (arena-based node store)
//!
//! Owns every node of one accessibility tree. Nodes live in slots; host ids
//! map to slot indices. Invalidating a node empties its slot and bumps the
//! slot generation so outstanding `NodeRef`s stop resolving.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::events::{self, AutomationEvent, EventCallback, ListenerFailure, ListenerId, PathNode};
use crate::generation::Generation;
use crate::node::AutomationNode;
use crate::{AutomationConfig, NodeId, TreeId};

/// Weak, generation-checked reference to a node in some tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    tree: TreeId,
    id: NodeId,
    slot: u32,
    generation: Generation,
}

impl NodeRef {
    pub(crate) fn new(tree: TreeId, id: NodeId, slot: u32, generation: Generation) -> Self {
        Self { tree, id, slot, generation }
    }

    pub fn tree_id(&self) -> TreeId {
        self.tree
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: Generation,
    node: Option<AutomationNode>,
}

/// Node store for one tree id
#[derive(Debug)]
pub struct AutomationTree {
    tree_id: TreeId,
    slots: Vec<Slot>,
    /// Empty slots available for reuse
    free: Vec<u32>,
    index: HashMap<NodeId, u32>,
    root: Option<NodeId>,
    /// Node hosting this tree in another tree
    host: Option<NodeRef>,
    config: Arc<AutomationConfig>,
}

impl AutomationTree {
    /// Create an empty tree with the default configuration
    pub fn new(tree_id: TreeId) -> Self {
        Self::with_config(tree_id, Arc::new(AutomationConfig::default()))
    }

    pub fn with_config(tree_id: TreeId, config: Arc<AutomationConfig>) -> Self {
        Self {
            tree_id,
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            root: None,
            host: None,
            config,
        }
    }

    pub fn tree_id(&self) -> TreeId {
        self.tree_id
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub(crate) fn config_arc(&self) -> Arc<AutomationConfig> {
        Arc::clone(&self.config)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Ids of all live nodes, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.index.keys().copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&AutomationNode> {
        let slot = *self.index.get(&id)?;
        self.slots.get(slot as usize)?.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut AutomationNode> {
        let slot = *self.index.get(&id)?;
        self.slots.get_mut(slot as usize)?.node.as_mut()
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root(&self) -> Option<&AutomationNode> {
        self.get(self.root?)
    }

    /// Mint a weak reference to a live node
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef> {
        let slot = *self.index.get(&id)?;
        let generation = self.slots.get(slot as usize)?.generation;
        Some(NodeRef::new(self.tree_id, id, slot, generation))
    }

    /// Resolve a reference minted by this tree; dead nodes resolve to `None`
    pub fn resolve(&self, node: &NodeRef) -> Option<&AutomationNode> {
        if node.tree != self.tree_id {
            return None;
        }
        let slot = self.slots.get(node.slot as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn resolve_mut(&mut self, node: &NodeRef) -> Option<&mut AutomationNode> {
        if node.tree != self.tree_id {
            return None;
        }
        let slot = self.slots.get_mut(node.slot as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Node in another tree that hosts this one
    pub fn host(&self) -> Option<NodeRef> {
        self.host
    }

    pub(crate) fn set_host(&mut self, host: Option<NodeRef>) {
        self.host = host;
    }

    // ------------------------------------------------------------------
    // Traversal (within this tree)
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<&AutomationNode> {
        self.get(self.get(id)?.parent_id?)
    }

    pub fn children(&self, id: NodeId) -> Vec<&AutomationNode> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        node.child_ids.iter().filter_map(|child| self.get(*child)).collect()
    }

    pub fn first_child(&self, id: NodeId) -> Option<&AutomationNode> {
        self.get(*self.get(id)?.child_ids.first()?)
    }

    pub fn last_child(&self, id: NodeId) -> Option<&AutomationNode> {
        self.get(*self.get(id)?.child_ids.last()?)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<&AutomationNode> {
        let node = self.get(id)?;
        let index = node.index_in_parent.checked_sub(1)?;
        let parent = self.get(node.parent_id?)?;
        self.get(*parent.child_ids.get(index)?)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<&AutomationNode> {
        let node = self.get(id)?;
        let parent = self.get(node.parent_id?)?;
        self.get(*parent.child_ids.get(node.index_in_parent + 1)?)
    }

    /// In-tree ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent_id);
        while let Some(parent) = current {
            // A cycle can only come from a corrupted update; stop rather than spin
            if ancestors.contains(&parent) || parent == id {
                tracing::warn!("Parent cycle at node {} in tree {}", parent, self.tree_id);
                break;
            }
            ancestors.push(parent);
            current = self.get(parent).and_then(|n| n.parent_id);
        }
        ancestors
    }

    // ------------------------------------------------------------------
    // Slot management
    // ------------------------------------------------------------------

    /// Place a node in a slot and index it by id
    pub(crate) fn insert(&mut self, node: AutomationNode) {
        let id = node.id;
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        self.slots[slot as usize].node = Some(node);
        self.index.insert(id, slot);
    }

    pub(crate) fn set_root(&mut self, id: Option<NodeId>) {
        self.root = id;
    }

    /// Remove `id` and its whole subtree from the store
    ///
    /// Removed ids are appended to `removed`, descendants before ancestors.
    pub(crate) fn invalidate(&mut self, id: NodeId, removed: &mut Vec<NodeId>) {
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                if self.free_slot(current) {
                    removed.push(current);
                }
                continue;
            }
            let Some(node) = self.get(current) else {
                continue;
            };
            stack.push((current, true));
            for child in node.child_ids.iter().rev() {
                stack.push((*child, false));
            }
        }
    }

    fn free_slot(&mut self, id: NodeId) -> bool {
        let Some(slot) = self.index.remove(&id) else {
            return false;
        };
        let entry = &mut self.slots[slot as usize];
        entry.node = None;
        entry.generation = entry.generation.next();
        self.free.push(slot);
        if self.root == Some(id) {
            self.root = None;
        }
        true
    }

    /// Drop every node
    pub(crate) fn invalidate_all(&mut self) -> Vec<NodeId> {
        let mut removed = Vec::new();
        if let Some(root) = self.root {
            self.invalidate(root, &mut removed);
        }
        // Nodes unreachable from the root (left behind by a failed update)
        let stragglers: Vec<NodeId> = self.index.keys().copied().collect();
        for id in stragglers {
            self.invalidate(id, &mut removed);
        }
        self.root = None;
        removed
    }

    // ------------------------------------------------------------------
    // Listeners and dispatch (within this tree)
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        callback: EventCallback,
        capture: bool,
    ) -> Option<ListenerId> {
        let node = self.get_mut(id)?;
        Some(node.listeners.add(event_type, callback, capture))
    }

    pub fn remove_event_listener(&mut self, id: NodeId, event_type: &str, listener: ListenerId) -> bool {
        self.get_mut(id)
            .map(|node| node.listeners.remove(event_type, listener))
            .unwrap_or(false)
    }

    pub(crate) fn path_node(&self, id: NodeId, event_type: &str) -> Option<PathNode> {
        let node = self.node_ref(id)?;
        let listeners = self.get(id)?.listeners.snapshot(event_type);
        Some(PathNode { node, listeners })
    }

    /// Dispatch an event along the in-tree ancestor path of `id`
    ///
    /// Does not cross into a hosting tree; see `Automation::dispatch_event`.
    pub fn dispatch_event(&self, id: NodeId, event_type: &str) -> Vec<ListenerFailure> {
        let Some(target) = self.path_node(id, event_type) else {
            tracing::warn!("Got {} event on unknown node {} in tree {}", event_type, id, self.tree_id);
            return Vec::new();
        };
        let path: Vec<PathNode> = self
            .ancestors(id)
            .into_iter()
            .filter_map(|ancestor| self.path_node(ancestor, event_type))
            .collect();
        let mut event = AutomationEvent::new(event_type, target.node);
        events::dispatch(&mut event, &target, &path)
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        let Some(node) = self.get(id) else {
            return Ok(());
        };
        writeln!(f, "{:indent$}{}", "", node, indent = indent)?;
        for child in &node.child_ids {
            self.fmt_subtree(f, *child, indent + 2)?;
        }
        Ok(())
    }
}

impl fmt::Display for AutomationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_subtree(f, root, 0),
            None => Ok(()),
        }
    }
}
