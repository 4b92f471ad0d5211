//! Automation Events
//!
//! Listener tables and three-phase event dispatch.
//!
//! An event travels along the ancestor path of its target:
//! - capturing: from the root down to the target's parent
//! - targeting: on the target itself
//! - bubbling: from the target's parent back up to the root
//!
//! A listener may stop propagation at any point, which ends dispatch once
//! the listeners of the current node have run.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::tree::NodeRef;

/// Event type names sent by the host
pub mod event_type {
    pub const ACTIVEDESCENDANTCHANGED: &str = "activedescendantchanged";
    pub const ALERT: &str = "alert";
    pub const BLUR: &str = "blur";
    pub const CHECKED_STATE_CHANGED: &str = "checkedStateChanged";
    pub const CHILDREN_CHANGED: &str = "childrenChanged";
    pub const DESTROYED: &str = "destroyed";
    pub const FOCUS: &str = "focus";
    pub const LOAD_COMPLETE: &str = "loadComplete";
    pub const LOCATION_CHANGED: &str = "locationChanged";
    pub const TEXT_CHANGED: &str = "textChanged";
    pub const VALUE_CHANGED: &str = "valueChanged";
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Capturing => "capturing",
            Self::AtTarget => "at-target",
            Self::Bubbling => "bubbling",
        };
        f.write_str(name)
    }
}

/// Event delivered to listeners
#[derive(Debug, Clone)]
pub struct AutomationEvent {
    pub event_type: String,
    pub target: NodeRef,
    current_target: Option<NodeRef>,
    phase: EventPhase,
    propagation_stopped: bool,
}

impl AutomationEvent {
    pub fn new(event_type: &str, target: NodeRef) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            phase: EventPhase::None,
            propagation_stopped: false,
        }
    }

    /// Node whose listeners are currently running
    pub fn current_target(&self) -> Option<NodeRef> {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Stop propagation to any further node
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Listener callback; returned errors are logged and never stop dispatch
pub type EventCallback = Rc<dyn Fn(&mut AutomationEvent) -> anyhow::Result<()>>;

/// Handle of a registered listener, unique within one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Clone)]
pub(crate) struct ListenerEntry {
    id: ListenerId,
    callback: EventCallback,
    capture: bool,
}

/// Per-node listeners, by event type, in registration order
#[derive(Default)]
pub struct ListenerTable {
    listeners: HashMap<String, Vec<ListenerEntry>>,
    next_id: u64,
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event_type, entries) in &self.listeners {
            map.entry(event_type, &entries.len());
        }
        map.finish()
    }
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    ///
    /// Registering a callback that is already registered for `event_type`
    /// replaces the old registration.
    pub fn add(&mut self, event_type: &str, callback: EventCallback, capture: bool) -> ListenerId {
        self.remove_callback(event_type, &callback);

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(ListenerEntry { id, callback, capture });
        id
    }

    /// Remove a listener by id
    pub fn remove(&mut self, event_type: &str, id: ListenerId) -> bool {
        self.remove_where(event_type, |entry| entry.id == id)
    }

    /// Remove a listener by callback identity
    pub fn remove_callback(&mut self, event_type: &str, callback: &EventCallback) -> bool {
        self.remove_where(event_type, |entry| Rc::ptr_eq(&entry.callback, callback))
    }

    fn remove_where(&mut self, event_type: &str, pred: impl Fn(&ListenerEntry) -> bool) -> bool {
        let Some(entries) = self.listeners.get_mut(event_type) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| !pred(entry));
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.listeners.remove(event_type);
        }
        removed
    }

    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listeners.contains_key(event_type)
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub(crate) fn snapshot(&self, event_type: &str) -> Vec<ListenerEntry> {
        self.listeners.get(event_type).cloned().unwrap_or_default()
    }
}

/// A listener that returned an error during dispatch
#[derive(Debug)]
pub struct ListenerFailure {
    pub event_type: String,
    pub phase: EventPhase,
    pub node: NodeRef,
    pub error: anyhow::Error,
}

/// One node on a dispatch path with its listeners captured up front
pub(crate) struct PathNode {
    pub node: NodeRef,
    pub listeners: Vec<ListenerEntry>,
}

/// Run capture, target and bubble phases
///
/// `path` holds the target's ancestors, nearest first.
pub(crate) fn dispatch(
    event: &mut AutomationEvent,
    target: &PathNode,
    path: &[PathNode],
) -> Vec<ListenerFailure> {
    let mut failures = Vec::new();

    event.phase = EventPhase::Capturing;
    for node in path.iter().rev() {
        fire(event, node, &mut failures);
        if event.propagation_stopped {
            return finish(event, failures);
        }
    }

    event.phase = EventPhase::AtTarget;
    fire(event, target, &mut failures);
    if event.propagation_stopped {
        return finish(event, failures);
    }

    event.phase = EventPhase::Bubbling;
    for node in path {
        fire(event, node, &mut failures);
        if event.propagation_stopped {
            break;
        }
    }
    finish(event, failures)
}

fn finish(event: &mut AutomationEvent, failures: Vec<ListenerFailure>) -> Vec<ListenerFailure> {
    event.phase = EventPhase::None;
    event.current_target = None;
    failures
}

fn fire(event: &mut AutomationEvent, node: &PathNode, failures: &mut Vec<ListenerFailure>) {
    event.current_target = Some(node.node);
    for entry in &node.listeners {
        match event.phase {
            EventPhase::Capturing if !entry.capture => continue,
            EventPhase::Bubbling if entry.capture => continue,
            _ => {}
        }

        if let Err(error) = (entry.callback)(event) {
            tracing::error!(
                "Error in event handler for {} during phase {}: {:#}",
                event.event_type,
                event.phase,
                error
            );
            failures.push(ListenerFailure {
                event_type: event.event_type.clone(),
                phase: event.phase,
                node: node.node,
                error,
            });
        }
    }
}
