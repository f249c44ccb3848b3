use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Grouping used by the discovery payload of `list_mcp_tools`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Database,
    Monitoring,
    System,
    Network,
    Automation,
    TimeSeries,
    Browser,
    Storage,
    Meta,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Database,
        Category::Monitoring,
        Category::System,
        Category::Network,
        Category::Automation,
        Category::TimeSeries,
        Category::Browser,
        Category::Storage,
        Category::Meta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Database => "Database",
            Category::Monitoring => "Monitoring",
            Category::System => "System",
            Category::Network => "Network",
            Category::Automation => "Automation",
            Category::TimeSeries => "TimeSeries",
            Category::Browser => "Browser",
            Category::Storage => "Storage",
            Category::Meta => "Meta",
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON-Schema-like object describing the arguments.
    pub parameters: Value,
    /// Only privileged credentials may invoke the tool.
    pub requires_privilege: bool,
    /// Backend operation the dispatcher routes the call to.
    pub executor_key: String,
    pub category: Category,
}

impl ToolSpec {
    /// Render in the completion backend's tool-definition shape.
    pub fn definition(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn required_parameters(&self) -> Vec<String> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Immutable name → spec registry. Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    specs: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(specs: Vec<ToolSpec>) -> Result<Self, ToolError> {
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            if index.insert(spec.name.clone(), position).is_some() {
                return Err(ToolError::DuplicateTool(spec.name.clone()));
            }
        }
        Ok(Self { specs, index })
    }

    /// The tools shipped with the relay. See [`crate::builtin`].
    pub fn builtin() -> Self {
        let specs = crate::builtin::specs();
        let index = specs
            .iter()
            .enumerate()
            .map(|(position, spec)| (spec.name.clone(), position))
            .collect();
        Self { specs, index }
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolSpec> {
        self.index.get(name).map(|&position| &self.specs[position])
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.specs.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name.as_str()).collect()
    }

    /// Every tool in tool-definition shape, in catalog order.
    pub fn definitions(&self) -> Vec<Value> {
        self.specs.iter().map(ToolSpec::definition).collect()
    }

    /// Discovery payload describing each tool, its parameters and tier.
    pub fn summary(&self) -> Value {
        let tools: Vec<Value> = self
            .specs
            .iter()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": spec.parameter_names(),
                    "required_params": spec.required_parameters(),
                    "admin_only": spec.requires_privilege
                })
            })
            .collect();

        let mut categories = Map::new();
        for category in Category::ALL {
            let members: Vec<&str> = self
                .specs
                .iter()
                .filter(|s| s.category == category)
                .map(|s| s.name.as_str())
                .collect();
            if !members.is_empty() {
                categories.insert(category.as_str().to_string(), json!(members));
            }
        }

        json!({
            "total_tools": tools.len(),
            "tools": tools,
            "categories": categories,
            "note": "These are MCP (Model Context Protocol) tools available for system interaction. Admin tools require special permissions."
        })
    }
}
