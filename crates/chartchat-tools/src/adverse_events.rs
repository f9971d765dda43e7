//! Adverse-event read-by-id.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use chartchat_fhir::FhirClient;

use crate::error::ToolError;
use crate::registry::{Tool, parse_params};

/// Dispatch name of the adverse-event read tool.
pub const ADVERSE_EVENT_READ: &str = "read_adverse_event";

const DESCRIPTION: &str = "\
Retrieves data about an adverse event that caused unintended physical \
injury to the patient — events resulting from or contributed to by medical \
care, research studies, or other healthcare setting factors that may \
require additional monitoring, treatment, or hospitalization.

The returned data includes the event details (type, description, date of \
occurrence), severity and seriousness classifications, expected vs. \
unexpected status, causality assessment, outcome, related research study \
or suspect entities, the recording practitioner, and severity history over \
time.

This will not include adverse events from other healthcare systems or \
potential events that have not been formally recorded.";

/// Parameters for [`AdverseEventReadTool`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdverseEventReadParams {
    /// FHIR id of the AdverseEvent resource to retrieve.
    pub id: String,
}

/// Reads a single adverse event by id.
pub struct AdverseEventReadTool {
    client: Arc<FhirClient>,
}

impl AdverseEventReadTool {
    /// Binds the tool to a patient-scoped client.
    #[must_use]
    pub fn new(client: Arc<FhirClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AdverseEventReadTool {
    fn name(&self) -> &'static str {
        ADVERSE_EVENT_READ
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The FHIR ID of the AdverseEvent resource to retrieve"
                }
            },
            "required": ["id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: AdverseEventReadParams = parse_params(ADVERSE_EVENT_READ, params)?;
        let resource = self.client.read("AdverseEvent", &params.id).await?;
        Ok(resource.into_json())
    }
}
