//! Automation Client
//!
//! Holds every mirrored tree, keyed by tree id, and connects them: frame
//! hosts link to the trees they embed, events dispatched inside an embedded
//! tree continue through the hosting node, and actions go out to the host.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::events::{self, event_type, AutomationEvent, EventCallback, ListenerFailure, ListenerId, PathNode};
use crate::host::{AccessibilityEventParams, Action, ActionRequest, AutomationHost, HostMessage};
use crate::linker::ChildTreeLinker;
use crate::node::AutomationNode;
use crate::sync::ChangeSet;
use crate::tree::{AutomationTree, NodeRef};
use crate::update::TreeUpdate;
use crate::{AutomationConfig, AutomationError, NodeId, TreeId};

/// Automation tree client
pub struct Automation {
    config: Arc<AutomationConfig>,
    trees: HashMap<TreeId, AutomationTree>,
    linker: ChildTreeLinker,
    host: Box<dyn AutomationHost>,
}

impl std::fmt::Debug for Automation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automation")
            .field("trees", &self.tree_ids())
            .field("pending_links", &self.linker.len())
            .finish()
    }
}

impl Automation {
    pub fn new(host: impl AutomationHost + 'static) -> Self {
        Self::with_config(host, AutomationConfig::default())
    }

    pub fn with_config(host: impl AutomationHost + 'static, config: AutomationConfig) -> Self {
        Self {
            config: Arc::new(config),
            trees: HashMap::new(),
            linker: ChildTreeLinker::new(),
            host: Box::new(host),
        }
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn linker(&self) -> &ChildTreeLinker {
        &self.linker
    }

    pub fn tree(&self, tree_id: TreeId) -> Option<&AutomationTree> {
        self.trees.get(&tree_id)
    }

    pub fn tree_mut(&mut self, tree_id: TreeId) -> Option<&mut AutomationTree> {
        self.trees.get_mut(&tree_id)
    }

    /// Known tree ids, sorted
    pub fn tree_ids(&self) -> Vec<TreeId> {
        let mut ids: Vec<TreeId> = self.trees.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Get or create the (possibly empty) tree for `tree_id`
    pub fn create_tree(&mut self, tree_id: TreeId) -> &mut AutomationTree {
        let config = Arc::clone(&self.config);
        self.trees
            .entry(tree_id)
            .or_insert_with(|| AutomationTree::with_config(tree_id, config))
    }

    pub fn node_ref(&self, tree_id: TreeId, id: NodeId) -> Option<NodeRef> {
        self.trees.get(&tree_id)?.node_ref(id)
    }

    pub fn resolve(&self, node: &NodeRef) -> Option<&AutomationNode> {
        self.trees.get(&node.tree_id())?.resolve(node)
    }

    fn resolve_mut(&mut self, node: &NodeRef) -> Option<&mut AutomationNode> {
        self.trees.get_mut(&node.tree_id())?.resolve_mut(node)
    }

    // ------------------------------------------------------------------
    // Traversal across linked trees
    // ------------------------------------------------------------------

    /// Parent of `node`; a tree root continues into its hosting node
    pub fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        let tree = self.trees.get(&node.tree_id())?;
        let current = tree.resolve(node)?;
        if tree.root_id() == Some(current.id) {
            if let Some(host) = tree.host().filter(|host| self.resolve(host).is_some()) {
                return Some(host);
            }
        }
        tree.node_ref(current.parent_id?)
    }

    /// Root of the tree linked under `node`, if any
    pub fn child_tree_root(&self, node: &NodeRef) -> Option<NodeRef> {
        let child_tree = self.resolve(node)?.child_tree?;
        let tree = self.trees.get(&child_tree)?;
        tree.node_ref(tree.root_id()?)
    }

    /// Children of `node`; a linked frame host has its child tree's root
    pub fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        if let Some(root) = self.child_tree_root(node) {
            return vec![root];
        }
        let Some(tree) = self.trees.get(&node.tree_id()) else {
            return Vec::new();
        };
        match tree.resolve(node) {
            Some(current) => current.child_ids.iter().filter_map(|id| tree.node_ref(*id)).collect(),
            None => Vec::new(),
        }
    }

    pub fn first_child(&self, node: &NodeRef) -> Option<NodeRef> {
        self.children(node).first().copied()
    }

    pub fn last_child(&self, node: &NodeRef) -> Option<NodeRef> {
        self.children(node).last().copied()
    }

    pub fn previous_sibling(&self, node: &NodeRef) -> Option<NodeRef> {
        let tree = self.trees.get(&node.tree_id())?;
        let sibling = tree.previous_sibling(tree.resolve(node)?.id)?;
        tree.node_ref(sibling.id)
    }

    pub fn next_sibling(&self, node: &NodeRef) -> Option<NodeRef> {
        let tree = self.trees.get(&node.tree_id())?;
        let sibling = tree.next_sibling(tree.resolve(node)?.id)?;
        tree.node_ref(sibling.id)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        node: &NodeRef,
        event_type: &str,
        callback: EventCallback,
        capture: bool,
    ) -> Result<ListenerId, AutomationError> {
        let target = self.resolve_mut(node).ok_or(AutomationError::StaleNode {
            tree_id: node.tree_id(),
            node_id: node.id(),
        })?;
        Ok(target.listeners.add(event_type, callback, capture))
    }

    pub fn remove_event_listener(&mut self, node: &NodeRef, event_type: &str, listener: ListenerId) -> bool {
        self.resolve_mut(node)
            .map(|target| target.listeners.remove(event_type, listener))
            .unwrap_or(false)
    }

    /// Ancestors of `target` across linked trees, nearest first
    pub fn event_path(&self, target: &NodeRef) -> Vec<NodeRef> {
        let mut path = Vec::new();
        let mut seen = HashSet::from([*target]);
        let mut current = self.parent(target);
        while let Some(node) = current {
            if !seen.insert(node) || path.len() >= self.config.max_event_path_depth {
                tracing::warn!(
                    "Event path from node {} in tree {} cut at {} ancestors",
                    target.id(),
                    target.tree_id(),
                    path.len()
                );
                break;
            }
            path.push(node);
            current = self.parent(&node);
        }
        path
    }

    fn path_node(&self, node: &NodeRef, event_type: &str) -> Option<PathNode> {
        let resolved = self.resolve(node)?;
        Some(PathNode { node: *node, listeners: resolved.listeners.snapshot(event_type) })
    }

    /// Dispatch `event_type` on `target` through capture, target and bubble phases
    pub fn dispatch_event(&self, target: &NodeRef, event_type: &str) -> Vec<ListenerFailure> {
        let Some(target_node) = self.path_node(target, event_type) else {
            tracing::warn!(
                "Got {} event on unknown node {} in tree {}",
                event_type,
                target.id(),
                target.tree_id()
            );
            return Vec::new();
        };
        let path: Vec<PathNode> = self
            .event_path(target)
            .iter()
            .filter_map(|node| self.path_node(node, event_type))
            .collect();

        let mut event = AutomationEvent::new(event_type, *target);
        events::dispatch(&mut event, &target_node, &path)
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    /// Apply an update to `tree_id`, creating the tree on first contact
    pub fn apply_update(&mut self, tree_id: TreeId, update: &TreeUpdate) -> Result<ChangeSet, AutomationError> {
        let result = self.create_tree(tree_id).apply_update(update);
        let changes = match result {
            Ok(changes) => changes,
            Err(source) => {
                tracing::warn!("Unserialization failed for tree {}: {}", tree_id, source);
                self.prune_stale_links();
                return Err(AutomationError::BadUpdate { tree_id, source });
            }
        };

        for request in &changes.child_tree_requests {
            let Some(host) = self.node_ref(tree_id, request.host) else {
                continue;
            };
            self.host.enable_child_tree(request.child_tree);
            if self.linker.register(request.child_tree, host) {
                tracing::debug!("Node {} in tree {} waits for child tree {}", request.host, tree_id, request.child_tree);
            }
        }

        self.prune_stale_links();
        Ok(changes)
    }

    /// Apply the event's update, then dispatch the event on its target
    pub fn on_accessibility_event(
        &mut self,
        params: &AccessibilityEventParams,
    ) -> Result<Vec<ListenerFailure>, AutomationError> {
        self.apply_update(params.tree_id, &params.update)?;

        match self.node_ref(params.tree_id, params.target_id) {
            Some(target) => Ok(self.dispatch_event(&target, &params.event_type)),
            None => {
                tracing::warn!(
                    "Got {} event on unknown node: {}; tree {}",
                    params.event_type,
                    params.target_id,
                    params.tree_id
                );
                Ok(Vec::new())
            }
        }
    }

    /// The host resolved `tree_id`: link it under every node waiting for it
    pub fn on_child_tree_resolved(&mut self, tree_id: TreeId) -> Result<Vec<ListenerFailure>, AutomationError> {
        let hosts = self.linker.take(tree_id);
        if !self.trees.contains_key(&tree_id) {
            tracing::warn!("Child tree {} resolved before any update arrived", tree_id);
            self.linker.restore(tree_id, hosts);
            return Err(AutomationError::UnknownTree(tree_id));
        }

        let mut linked = Vec::new();
        for host in hosts {
            if host.tree_id() == tree_id {
                tracing::warn!("Tree {} cannot host itself", tree_id);
                continue;
            }
            // The host may have been invalidated since it asked; nothing to do then
            let Some(node) = self.resolve_mut(&host) else {
                continue;
            };
            node.pending_child_frame = Some(false);
            node.child_tree = Some(tree_id);
            linked.push(host);
        }

        if let (Some(host), Some(tree)) = (linked.last(), self.trees.get_mut(&tree_id)) {
            tree.set_host(Some(*host));
        }

        let mut failures = Vec::new();
        for host in &linked {
            tracing::debug!("Linked tree {} under node {} of tree {}", tree_id, host.id(), host.tree_id());
            failures.extend(self.dispatch_event(host, event_type::CHILDREN_CHANGED));
        }
        Ok(failures)
    }

    /// Tear down `tree_id`, unlinking it from its host first
    pub fn destroy_tree(&mut self, tree_id: TreeId) -> Result<Vec<ListenerFailure>, AutomationError> {
        let tree = self.trees.get_mut(&tree_id).ok_or(AutomationError::UnknownTree(tree_id))?;
        let host = tree.host();
        tree.set_host(None);
        let root = tree.root_id().and_then(|root| tree.node_ref(root));

        if let Some(node) = host.and_then(|host| self.resolve_mut(&host)) {
            if node.child_tree == Some(tree_id) {
                node.child_tree = None;
            }
        }

        let failures = match root {
            Some(root) => self.dispatch_event(&root, event_type::DESTROYED),
            None => Vec::new(),
        };

        if let Some(mut tree) = self.trees.remove(&tree_id) {
            let removed = tree.invalidate_all();
            tracing::debug!("Destroyed tree {} ({} nodes)", tree_id, removed.len());
        }
        self.prune_stale_links();
        Ok(failures)
    }

    /// Route one inbound host message
    pub fn handle_message(&mut self, message: &HostMessage) -> Result<Vec<ListenerFailure>, AutomationError> {
        match message {
            HostMessage::AccessibilityEvent(params) => self.on_accessibility_event(params),
            HostMessage::ChildTreeResolved { tree_id } => self.on_child_tree_resolved(*tree_id),
            HostMessage::DestroyTree { tree_id } => self.destroy_tree(*tree_id),
        }
    }

    /// Drop links whose node no longer exists
    fn prune_stale_links(&mut self) {
        let stale: Vec<TreeId> = self
            .trees
            .values()
            .filter(|tree| tree.host().is_some_and(|host| self.resolve(&host).is_none()))
            .map(|tree| tree.tree_id())
            .collect();
        for tree_id in stale {
            tracing::debug!("Tree {} lost its host node", tree_id);
            if let Some(tree) = self.trees.get_mut(&tree_id) {
                tree.set_host(None);
            }
        }

        let trees = &self.trees;
        self.linker.retain(|host| {
            trees
                .get(&host.tree_id())
                .and_then(|tree| tree.resolve(host))
                .is_some()
        });
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Ask the host to perform `action` on `node`
    pub fn perform_action(&mut self, node: &NodeRef, action: Action) -> Result<(), AutomationError> {
        self.ensure_alive(node)?;
        if !self.host.is_interact_permitted() {
            return Err(AutomationError::PermissionDenied { action: action.name() });
        }
        self.host.perform_action(&ActionRequest {
            tree_id: node.tree_id(),
            node_id: node.id(),
            action,
        });
        Ok(())
    }

    pub fn do_default(&mut self, node: &NodeRef) -> Result<(), AutomationError> {
        self.perform_action(node, Action::DoDefault)
    }

    pub fn focus(&mut self, node: &NodeRef) -> Result<(), AutomationError> {
        self.perform_action(node, Action::Focus)
    }

    pub fn make_visible(&mut self, node: &NodeRef) -> Result<(), AutomationError> {
        self.perform_action(node, Action::MakeVisible)
    }

    pub fn set_selection(&mut self, node: &NodeRef, start_index: i32, end_index: i32) -> Result<(), AutomationError> {
        self.perform_action(node, Action::SetSelection { start_index, end_index })
    }

    /// Find a descendant of `node` matching `selector` through the host
    pub fn query_selector(&mut self, node: &NodeRef, selector: &str) -> Result<Option<NodeRef>, AutomationError> {
        self.ensure_alive(node)?;
        let result = match self.host.query_selector(node.tree_id(), node.id(), selector) {
            None | Some(0) => return Ok(None),
            Some(raw) => NodeId(raw),
        };

        let found = self.node_ref(node.tree_id(), result);
        if found.is_none() {
            tracing::warn!("Query selector result not in tree: {}", result);
        }
        Ok(found)
    }

    fn ensure_alive(&self, node: &NodeRef) -> Result<(), AutomationError> {
        if !self.trees.contains_key(&node.tree_id()) {
            return Err(AutomationError::UnknownTree(node.tree_id()));
        }
        match self.resolve(node) {
            Some(_) => Ok(()),
            None => Err(AutomationError::StaleNode { tree_id: node.tree_id(), node_id: node.id() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeData, NullHost};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct HostLog {
        actions: Vec<ActionRequest>,
        enabled: Vec<TreeId>,
        selectors: Vec<String>,
    }

    struct RecordingHost {
        log: Rc<RefCell<HostLog>>,
        permitted: bool,
        selector_result: Option<i32>,
    }

    impl AutomationHost for RecordingHost {
        fn is_interact_permitted(&self) -> bool {
            self.permitted
        }

        fn perform_action(&mut self, request: &ActionRequest) {
            self.log.borrow_mut().actions.push(*request);
        }

        fn enable_child_tree(&mut self, child_tree: TreeId) {
            self.log.borrow_mut().enabled.push(child_tree);
        }

        fn query_selector(&mut self, _tree_id: TreeId, _node_id: NodeId, selector: &str) -> Option<i32> {
            self.log.borrow_mut().selectors.push(selector.to_string());
            self.selector_result
        }
    }

    fn recording(permitted: bool, selector_result: Option<i32>) -> (Automation, Rc<RefCell<HostLog>>) {
        let log = Rc::new(RefCell::new(HostLog::default()));
        let host = RecordingHost { log: Rc::clone(&log), permitted, selector_result };
        (Automation::new(host), log)
    }

    fn page(automation: &mut Automation) {
        automation
            .apply_update(
                TreeId(1),
                &TreeUpdate::new(vec![
                    NodeData::new(1, "rootWebArea").with_children(&[2, 3]),
                    NodeData::new(2, "button"),
                    NodeData::new(3, "webView").with_int("childTreeId", 2),
                ]),
            )
            .unwrap();
    }

    fn frame(automation: &mut Automation) {
        automation
            .apply_update(
                TreeId(2),
                &TreeUpdate::new(vec![
                    NodeData::new(10, "rootWebArea").with_children(&[11]),
                    NodeData::new(11, "link"),
                ]),
            )
            .unwrap();
    }

    fn logger(log: &Rc<RefCell<Vec<String>>>, name: &str) -> EventCallback {
        let log = Rc::clone(log);
        let name = name.to_string();
        Rc::new(move |event: &mut AutomationEvent| -> anyhow::Result<()> {
            log.borrow_mut().push(format!("{}:{}", name, event.event_type));
            Ok(())
        })
    }

    #[test]
    fn test_child_tree_link_and_cross_tree_path() {
        let (mut automation, log) = recording(true, None);
        page(&mut automation);
        assert_eq!(log.borrow().enabled, vec![TreeId(2)]);
        assert!(automation.linker().is_pending(TreeId(2)));

        frame(&mut automation);
        let host = automation.node_ref(TreeId(1), NodeId(3)).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        automation
            .add_event_listener(&host, event_type::CHILDREN_CHANGED, logger(&events, "host"), false)
            .unwrap();

        let failures = automation.on_child_tree_resolved(TreeId(2)).unwrap();
        assert!(failures.is_empty());
        assert_eq!(*events.borrow(), vec!["host:childrenChanged"]);
        assert!(!automation.linker().is_pending(TreeId(2)));

        let host_node = automation.resolve(&host).unwrap();
        assert_eq!(host_node.child_tree(), Some(TreeId(2)));
        assert!(!host_node.is_child_frame_pending());

        let frame_root = automation.first_child(&host).unwrap();
        assert_eq!((frame_root.tree_id(), frame_root.id()), (TreeId(2), NodeId(10)));
        assert_eq!(automation.parent(&frame_root), Some(host));

        let link = automation.node_ref(TreeId(2), NodeId(11)).unwrap();
        let path: Vec<(TreeId, NodeId)> = automation
            .event_path(&link)
            .iter()
            .map(|n| (n.tree_id(), n.id()))
            .collect();
        assert_eq!(
            path,
            vec![(TreeId(2), NodeId(10)), (TreeId(1), NodeId(3)), (TreeId(1), NodeId(1))]
        );

        // Linked hosts are not asked again
        page(&mut automation);
        assert_eq!(log.borrow().enabled, vec![TreeId(2)]);
    }

    #[test]
    fn test_resolution_for_dead_host_is_noop() {
        let (mut automation, _log) = recording(true, None);
        page(&mut automation);
        frame(&mut automation);

        // Drop the frame host before the host answers
        automation
            .apply_update(TreeId(1), &TreeUpdate::new(vec![NodeData::new(1, "rootWebArea").with_children(&[2])]))
            .unwrap();
        assert!(!automation.linker().is_pending(TreeId(2)));

        let failures = automation.on_child_tree_resolved(TreeId(2)).unwrap();
        assert!(failures.is_empty());
        assert!(automation.tree(TreeId(2)).unwrap().host().is_none());
    }

    #[test]
    fn test_host_invalidation_clears_back_link() {
        let (mut automation, _log) = recording(true, None);
        page(&mut automation);
        frame(&mut automation);
        automation.on_child_tree_resolved(TreeId(2)).unwrap();
        assert!(automation.tree(TreeId(2)).unwrap().host().is_some());

        automation
            .apply_update(TreeId(1), &TreeUpdate::new(vec![NodeData::new(1, "rootWebArea").with_children(&[2])]))
            .unwrap();
        assert!(automation.tree(TreeId(2)).unwrap().host().is_none());
        let frame_root = automation.node_ref(TreeId(2), NodeId(10)).unwrap();
        assert!(automation.parent(&frame_root).is_none());
    }

    #[test]
    fn test_resolution_before_tree_exists() {
        let (mut automation, _log) = recording(true, None);
        page(&mut automation);
        let err = automation.on_child_tree_resolved(TreeId(2)).unwrap_err();
        assert!(matches!(err, AutomationError::UnknownTree(TreeId(2))));
        assert!(automation.linker().is_pending(TreeId(2)));
    }

    #[test]
    fn test_destroy_tree_unlinks_host() {
        let (mut automation, _log) = recording(true, None);
        page(&mut automation);
        frame(&mut automation);
        automation.on_child_tree_resolved(TreeId(2)).unwrap();

        let frame_root = automation.node_ref(TreeId(2), NodeId(10)).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        automation
            .add_event_listener(&frame_root, event_type::DESTROYED, logger(&events, "frame"), false)
            .unwrap();

        automation.destroy_tree(TreeId(2)).unwrap();
        assert_eq!(*events.borrow(), vec!["frame:destroyed"]);
        assert!(automation.tree(TreeId(2)).is_none());
        assert!(automation.resolve(&frame_root).is_none());

        let host = automation.node_ref(TreeId(1), NodeId(3)).unwrap();
        assert_eq!(automation.resolve(&host).unwrap().child_tree(), None);
        assert!(automation.first_child(&host).is_none());

        assert!(matches!(
            automation.destroy_tree(TreeId(2)),
            Err(AutomationError::UnknownTree(TreeId(2)))
        ));
    }

    #[test]
    fn test_actions_need_permission() {
        let (mut automation, log) = recording(false, None);
        page(&mut automation);
        let button = automation.node_ref(TreeId(1), NodeId(2)).unwrap();

        let err = automation.focus(&button).unwrap_err();
        assert!(matches!(err, AutomationError::PermissionDenied { action: "focus" }));
        assert!(log.borrow().actions.is_empty());
    }

    #[test]
    fn test_actions_reach_host() {
        let (mut automation, log) = recording(true, None);
        page(&mut automation);
        let button = automation.node_ref(TreeId(1), NodeId(2)).unwrap();

        automation.do_default(&button).unwrap();
        automation.set_selection(&button, 1, 3).unwrap();
        let actions = &log.borrow().actions;
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, Action::DoDefault);
        assert_eq!(actions[1].action, Action::SetSelection { start_index: 1, end_index: 3 });
        assert_eq!(actions[1].node_id, NodeId(2));
    }

    #[test]
    fn test_action_on_stale_node() {
        let (mut automation, log) = recording(true, None);
        page(&mut automation);
        let button = automation.node_ref(TreeId(1), NodeId(2)).unwrap();
        automation
            .apply_update(TreeId(1), &TreeUpdate::new(vec![NodeData::new(1, "rootWebArea").with_children(&[3])]))
            .unwrap();

        let err = automation.make_visible(&button).unwrap_err();
        assert!(matches!(err, AutomationError::StaleNode { node_id: NodeId(2), .. }));
        assert!(log.borrow().actions.is_empty());
    }

    #[test]
    fn test_query_selector_results() {
        let (mut automation, log) = recording(true, Some(2));
        page(&mut automation);
        let root = automation.node_ref(TreeId(1), NodeId(1)).unwrap();
        let found = automation.query_selector(&root, "button").unwrap();
        assert_eq!(found.map(|n| n.id()), Some(NodeId(2)));
        assert_eq!(log.borrow().selectors, vec!["button"]);

        let (mut automation, _log) = recording(true, Some(0));
        page(&mut automation);
        let root = automation.node_ref(TreeId(1), NodeId(1)).unwrap();
        assert!(automation.query_selector(&root, "nothing").unwrap().is_none());

        let (mut automation, _log) = recording(true, Some(77));
        page(&mut automation);
        let root = automation.node_ref(TreeId(1), NodeId(1)).unwrap();
        assert!(automation.query_selector(&root, "stray").unwrap().is_none());
    }

    #[test]
    fn test_bad_update_surfaces_tree_id() {
        let mut automation = Automation::new(NullHost);
        let err = automation
            .apply_update(TreeId(4), &TreeUpdate::new(vec![NodeData::new(1, "rootWebArea").with_children(&[2])]))
            .unwrap_err();
        match err {
            AutomationError::BadUpdate { tree_id, source } => {
                assert_eq!(tree_id, TreeId(4));
                assert!(matches!(source, crate::SyncError::UnresolvedPendingNodes { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_event_on_unknown_target_is_dropped() {
        let mut automation = Automation::new(NullHost);
        let params = AccessibilityEventParams {
            tree_id: TreeId(1),
            target_id: NodeId(99),
            event_type: event_type::FOCUS.to_string(),
            update: TreeUpdate::new(vec![NodeData::new(1, "rootWebArea")]),
        };
        let failures = automation.on_accessibility_event(&params).unwrap();
        assert!(failures.is_empty());
        assert_eq!(automation.tree(TreeId(1)).unwrap().len(), 1);
    }
}
