//! Attribute Resolution
//!
//! Attribute values as received from the host, and the public read path that
//! turns id-reference attributes into node lookups.

use serde_json::Value;

use crate::node::AutomationNode;
use crate::tree::AutomationTree;
use crate::NodeId;

/// Public attribute names whose value is read through an internal id attribute
pub const ID_REFERENCE_ATTRIBUTES: &[(&str, &str)] = &[
    ("aria-activedescendant", "activedescendantId"),
    ("aria-controls", "controlsIds"),
    ("aria-describedby", "describedbyIds"),
    ("aria-flowto", "flowtoIds"),
    ("aria-labelledby", "labelledbyIds"),
    ("aria-owns", "ownsIds"),
];

/// Internal-only attribute names, never exposed through the public API
pub const HIDDEN_ATTRIBUTES: &[&str] = &[
    "activedescendantId",
    "childTreeId",
    "controlsIds",
    "describedbyIds",
    "flowtoIds",
    "labelledbyIds",
    "ownsIds",
];

pub(crate) fn is_hidden(name: &str) -> bool {
    HIDDEN_ATTRIBUTES.contains(&name)
}

fn id_reference_source(name: &str) -> Option<&'static str> {
    ID_REFERENCE_ATTRIBUTES
        .iter()
        .find(|(public, _)| *public == name)
        .map(|(_, internal)| *internal)
}

/// Typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Float(f64),
    Int(i64),
    IntList(Vec<i64>),
    /// String and html attributes
    String(String),
}

impl AttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::from(*b),
            Self::Float(f) => Value::from(*f),
            Self::Int(i) => Value::from(*i),
            Self::IntList(list) => Value::from(list.clone()),
            Self::String(s) => Value::from(s.as_str()),
        }
    }
}

/// Attribute as seen through the public API
#[derive(Debug)]
pub enum Attribute<'a> {
    /// Plain stored value
    Value(&'a AttributeValue),
    /// Single id reference; `None` when the id is missing or not in the tree
    Node(Option<&'a AutomationNode>),
    /// Id-list reference; unresolvable ids keep their position as `None`
    NodeList(Vec<Option<&'a AutomationNode>>),
}

impl<'a> Attribute<'a> {
    pub fn as_value(&self) -> Option<&'a AttributeValue> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&'a AutomationNode> {
        match self {
            Self::Node(n) => *n,
            _ => None,
        }
    }

    pub fn as_node_list(&self) -> Option<&[Option<&'a AutomationNode>]> {
        match self {
            Self::NodeList(list) => Some(list.as_slice()),
            _ => None,
        }
    }
}

impl AutomationTree {
    /// Read a public attribute of node `id`
    ///
    /// Hidden names and attributes the node never received return `None`.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<Attribute<'_>> {
        let node = self.get(id)?;
        if !node.attribute_names.iter().any(|n| n == name) {
            return None;
        }

        let Some(internal) = id_reference_source(name) else {
            return node.attributes_internal.get(name).map(Attribute::Value);
        };

        let resolved = match node.attributes_internal.get(internal) {
            Some(AttributeValue::IntList(ids)) => {
                Attribute::NodeList(ids.iter().map(|raw| self.lookup_raw(*raw)).collect())
            }
            Some(AttributeValue::Int(raw)) => Attribute::Node(self.lookup_raw(*raw)),
            _ => Attribute::Node(None),
        };
        Some(resolved)
    }

    /// Public attribute names of node `id`
    pub fn attribute_names(&self, id: NodeId) -> Vec<&str> {
        self.get(id)
            .map(|node| node.attribute_names().collect())
            .unwrap_or_default()
    }

    fn lookup_raw(&self, raw: i64) -> Option<&AutomationNode> {
        let id = i32::try_from(raw).ok()?;
        self.get(NodeId(id))
    }
}
