//! Automation Configuration

use serde::Deserialize;

use crate::AutomationError;

/// Automation client configuration options
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutomationConfig {
    /// Roles allowed to introduce a new root into an empty tree
    pub root_roles: Vec<String>,

    /// Roles of nodes that host a child tree
    pub frame_host_roles: Vec<String>,

    /// Int attribute carrying the hosted child tree id
    pub child_tree_id_attribute: String,

    /// Maximum number of ancestors visited when building an event path
    pub max_event_path_depth: usize,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            root_roles: vec!["rootWebArea".to_string(), "desktop".to_string()],
            frame_host_roles: vec!["webView".to_string()],
            child_tree_id_attribute: "childTreeId".to_string(),
            max_event_path_depth: 256,
        }
    }
}

impl AutomationConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, AutomationError> {
        serde_json::from_str(json).map_err(|e| AutomationError::Config(e.to_string()))
    }

    /// Whether `role` may become the root of an empty tree
    pub fn is_root_role(&self, role: &str) -> bool {
        self.root_roles.iter().any(|r| r == role)
    }

    /// Whether `role` marks a node hosting a child tree
    pub fn is_frame_host_role(&self, role: &str) -> bool {
        self.frame_host_roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roles() {
        let config = AutomationConfig::default();
        assert!(config.is_root_role("rootWebArea"));
        assert!(config.is_root_role("desktop"));
        assert!(!config.is_root_role("button"));
        assert!(config.is_frame_host_role("webView"));
        assert!(!config.is_frame_host_role("rootWebArea"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AutomationConfig::from_json(r#"{"frameHostRoles": ["webView", "iframe"]}"#)
            .unwrap();
        assert!(config.is_frame_host_role("iframe"));
        assert_eq!(config.child_tree_id_attribute, "childTreeId");
        assert_eq!(config.max_event_path_depth, 256);
    }

    #[test]
    fn test_invalid_json() {
        let err = AutomationConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AutomationError::Config(_)));
    }
}
