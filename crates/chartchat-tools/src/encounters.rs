//! Encounter search.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::{Value, json};

use chartchat_core::Resource;
use chartchat_fhir::{FhirClient, SearchParams};

use crate::error::ToolError;
use crate::registry::{Tool, parse_params};

/// Dispatch name of the encounter search tool.
pub const ENCOUNTER_SEARCH: &str = "search_encounters";

const DESCRIPTION: &str = "\
Retrieves encounter information defining the setting where patient care \
takes place, across ambulatory (outpatient), inpatient, emergency, home \
health, and virtual care settings.

The returned data includes the encounter status and classification, the \
encounter type (e.g. Office Visit, Hospital Visit), the period, the \
participating providers, the location, associated diagnoses, and the \
service provider organization.

Important behavior of the upstream API: all inpatient encounters in the \
requested period are returned, but only checked-in outpatient encounters \
are — upcoming appointments are not encounters, and encounter IDs are not \
valid until the encounter has started. Use the appointment search for \
upcoming appointments.";

/// Parameters for [`EncounterSearchTool`]. All filters are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EncounterSearchParams {
    /// Classification of patient encounter.
    #[serde(default)]
    pub class: Option<String>,
    /// A date or date range the encounter takes place (YYYY-MM-DD).
    #[serde(default)]
    pub date: Option<String>,
    /// Identifier in `<code system>|<code>` format.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Encounter status (planned, arrived, in-progress, finished, ...).
    #[serde(default)]
    pub status: Option<String>,
}

/// Searches the bound patient's encounters, following pagination to the
/// end of the upstream result set.
pub struct EncounterSearchTool {
    client: Arc<FhirClient>,
}

impl EncounterSearchTool {
    /// Binds the tool to a patient-scoped client.
    #[must_use]
    pub fn new(client: Arc<FhirClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for EncounterSearchTool {
    fn name(&self) -> &'static str {
        ENCOUNTER_SEARCH
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "class": {
                    "type": "string",
                    "description": "Classification of patient encounter"
                },
                "date": {
                    "type": "string",
                    "description": "A date or date range the encounter takes place (YYYY-MM-DD)"
                },
                "identifier": {
                    "type": "string",
                    "description": "Identifier by which this encounter is known, in <code system>|<code> format"
                },
                "status": {
                    "type": "string",
                    "description": "The encounter status (e.g. planned, arrived, triaged, in-progress, finished)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: EncounterSearchParams = parse_params(ENCOUNTER_SEARCH, params)?;

        let mut search = SearchParams::new();
        search.push("patient", self.client.patient_id());
        search.push_opt("class", params.class);
        search.push_opt("date", params.date);
        search.push_opt("identifier", params.identifier);
        search.push_opt("status", params.status);

        let encounters: Vec<Resource> = self
            .client
            .search_all("Encounter", &search)
            .try_collect()
            .await?;
        Ok(Value::Array(
            encounters.into_iter().map(Resource::into_json).collect(),
        ))
    }
}
