use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Architectural role of an indexed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    Service,
    Repository,
    Controller,
    ExternalApiClient,
    DomainModel,
    Test,
    BackgroundJob,
    Configuration,
    Utility,
    Unknown,
}

impl NodeCategory {
    /// Classify a type by its name suffix. Case-sensitive.
    pub fn from_type_name(name: &str) -> Self {
        if name.ends_with("Service") {
            NodeCategory::Service
        } else if name.ends_with("Repository") {
            NodeCategory::Repository
        } else if name.ends_with("Controller") {
            NodeCategory::Controller
        } else if name.ends_with("Tests") {
            NodeCategory::Test
        } else if name.ends_with("Model") || name.ends_with("Dto") {
            NodeCategory::DomainModel
        } else {
            NodeCategory::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeCategory::Service => "Service",
            NodeCategory::Repository => "Repository",
            NodeCategory::Controller => "Controller",
            NodeCategory::ExternalApiClient => "ExternalApiClient",
            NodeCategory::DomainModel => "DomainModel",
            NodeCategory::Test => "Test",
            NodeCategory::BackgroundJob => "BackgroundJob",
            NodeCategory::Configuration => "Configuration",
            NodeCategory::Utility => "Utility",
            NodeCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One indexed code unit. Currently a method inside a class.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Node {
    pub node_id: String,
    pub category: NodeCategory,
    pub path: String,
    pub line_start: i64,
    pub line_end: i64,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub deps: BTreeSet<String>,
    /// rule id -> amplitude in [0.0, 1.0]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rule_amplitudes: BTreeMap<String, f64>,
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Rule {
    pub rule_id: String,
    pub priority: f64,
    pub description: String,
}

impl Rule {
    pub fn new(rule_id: &str, priority: f64, description: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            priority,
            description: description.to_string(),
        }
    }
}

/// A past architectural choice, optionally tied to a rule.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Decision {
    pub decision_id: String,
    pub rule_id: Option<String>,
    pub context: String,
    #[serde(default)]
    pub scope_nodes: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CompileContextResult {
    pub bytecode: String,
    pub summary: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct FetchCodeResult {
    pub path: String,
    pub code: String,
}
