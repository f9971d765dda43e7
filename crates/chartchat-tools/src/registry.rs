//! Tool contract and name-keyed dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use chartchat_fhir::FhirClient;

use crate::adverse_events::AdverseEventReadTool;
use crate::appointments::AppointmentSearchTool;
use crate::documents::DocumentReferenceSearchTool;
use crate::encounters::EncounterSearchTool;
use crate::error::ToolError;

/// A named, schema-validated callable exposed to the orchestration loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name used as the dispatch key.
    fn name(&self) -> &'static str;

    /// Capability description the orchestration loop uses to decide when
    /// to invoke the tool.
    fn description(&self) -> &'static str;

    /// JSON schema for the tool's parameters.
    fn parameters(&self) -> Value;

    /// Runs the tool. Every invocation is a fresh upstream call; adapters
    /// neither cache nor mutate results.
    async fn execute(&self, params: Value) -> Result<Value, ToolError>;
}

/// Deserializes tool parameters, rejecting unknown fields and wrong
/// shapes before anything reaches the client.
pub(crate) fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::invalid_params(tool, e.to_string()))
}

/// Serializable descriptor of a registered tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    /// Dispatch key.
    pub name: &'static str,
    /// Capability description.
    pub description: &'static str,
    /// JSON parameter schema.
    pub parameters: Value,
}

/// Registry of tools bound to one patient-scoped client.
///
/// Dispatch is keyed by tool name; each registered adapter carries its own
/// validated parameter structure, so no runtime type inspection happens
/// here.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Creates a registry with the standard adapters bound to `client`.
    #[must_use]
    pub fn for_client(client: Arc<FhirClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AppointmentSearchTool::new(client.clone())));
        registry.register(Box::new(EncounterSearchTool::new(client.clone())));
        registry.register(Box::new(DocumentReferenceSearchTool::new(client.clone())));
        registry.register(Box::new(AdverseEventReadTool::new(client)));
        registry
    }

    /// Registers a tool under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Descriptors for every registered tool, sorted by name for a stable
    /// listing.
    #[must_use]
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> = self
            .tools
            .values()
            .map(|t| ToolDescriptor {
                name: t.name(),
                description: t.description(),
                parameters: t.parameters(),
            })
            .collect();
        descriptors.sort_by_key(|d| d.name);
        descriptors
    }

    /// Dispatches a tool invocation by name.
    pub async fn dispatch(&self, name: &str, params: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tracing::debug!(tool = name, "Dispatching tool invocation");
        tool.execute(params).await
    }
}
