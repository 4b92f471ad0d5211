//! Child Tree Linking
//!
//! Frame-hosting nodes ask the host to start tracking the tree they embed.
//! The host answers later, possibly after more updates, so the waiting host
//! nodes are parked here by child tree id until the resolution arrives.

use std::collections::HashMap;

use crate::tree::NodeRef;
use crate::TreeId;

/// Host nodes waiting for their child tree
#[derive(Debug, Default)]
pub struct ChildTreeLinker {
    pending: HashMap<TreeId, Vec<NodeRef>>,
}

impl ChildTreeLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `host` until `child_tree` resolves
    ///
    /// Returns false if the same host was already waiting for that tree.
    pub fn register(&mut self, child_tree: TreeId, host: NodeRef) -> bool {
        let waiting = self.pending.entry(child_tree).or_default();
        if waiting.contains(&host) {
            return false;
        }
        waiting.push(host);
        true
    }

    /// Take every host waiting for `child_tree`
    pub fn take(&mut self, child_tree: TreeId) -> Vec<NodeRef> {
        self.pending.remove(&child_tree).unwrap_or_default()
    }

    /// Put hosts back after a resolution that could not be completed
    pub fn restore(&mut self, child_tree: TreeId, hosts: Vec<NodeRef>) {
        for host in hosts {
            self.register(child_tree, host);
        }
    }

    pub fn is_pending(&self, child_tree: TreeId) -> bool {
        self.pending.contains_key(&child_tree)
    }

    /// Number of parked registrations
    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop registrations whose host no longer resolves
    pub fn retain(&mut self, mut alive: impl FnMut(&NodeRef) -> bool) {
        self.pending.retain(|_, hosts| {
            hosts.retain(|host| alive(host));
            !hosts.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Generation, NodeId};

    fn host(id: i32) -> NodeRef {
        NodeRef::new(TreeId(1), NodeId(id), id as u32, Generation::INITIAL)
    }

    #[test]
    fn test_register_and_take() {
        let mut linker = ChildTreeLinker::new();
        assert!(linker.register(TreeId(7), host(2)));
        assert!(!linker.register(TreeId(7), host(2)));
        assert!(linker.register(TreeId(7), host(3)));
        assert_eq!(linker.len(), 2);
        assert!(linker.is_pending(TreeId(7)));

        assert_eq!(linker.take(TreeId(7)), vec![host(2), host(3)]);
        assert!(linker.is_empty());
        assert!(linker.take(TreeId(7)).is_empty());
    }

    #[test]
    fn test_retain_drops_dead_hosts() {
        let mut linker = ChildTreeLinker::new();
        linker.register(TreeId(7), host(2));
        linker.register(TreeId(8), host(3));

        linker.retain(|node| node.id() != NodeId(3));
        assert!(linker.is_pending(TreeId(7)));
        assert!(!linker.is_pending(TreeId(8)));
    }

    #[test]
    fn test_restore() {
        let mut linker = ChildTreeLinker::new();
        linker.register(TreeId(7), host(2));
        let hosts = linker.take(TreeId(7));
        linker.restore(TreeId(7), hosts);
        assert_eq!(linker.len(), 1);
    }
}
