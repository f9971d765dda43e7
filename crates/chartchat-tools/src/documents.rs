//! Clinical-note document-reference search.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::{Value, json};

use chartchat_core::Resource;
use chartchat_fhir::{FhirClient, SearchParams};

use crate::error::ToolError;
use crate::registry::{Tool, parse_params};

/// Dispatch name of the document-reference search tool.
pub const DOCUMENT_REFERENCE_SEARCH: &str = "search_document_references";

const DESCRIPTION: &str = "\
Searches for clinical notes and documentation via the DocumentReference \
resource, as profiled by the US Core Implementation Guide. Returns \
references to clinical note records for the patient, optionally filtered \
by document type, status, encounter, note creation time, or the period of \
the documented service.

The returned data includes the document type and category, the document \
status (preliminary, final, amended, entered-in-error), the creation date, \
the authors and authenticator, content attachments with URLs to Binary \
resources holding the actual note text, and the associated encounter.

Common document types (LOINC codes): Discharge Documentation (18842-5), \
Consultation (11488-4), History & Physical (34117-2), Progress Note \
(11506-3), Procedure Note (28570-0), Emergency Department Note (34111-5), \
Nurse Note (34746-8).

The upstream API requires either category=\"clinical-note\" or a type \
(LOINC code) on every search; requests with neither are rejected upstream. \
Note content is returned as references to Binary resources, not as full \
text.";

/// Parameters for [`DocumentReferenceSearchTool`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentReferenceSearchParams {
    /// Document category; "clinical-note" for clinical notes. Either
    /// category or type is required by the upstream.
    #[serde(default)]
    pub category: Option<String>,
    /// LOINC code of the document type. Either category or type is
    /// required by the upstream.
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    /// When the document reference was created (YYYY-MM-DD or range).
    #[serde(default)]
    pub date: Option<String>,
    /// Document status: preliminary, final, amended, or entered-in-error.
    #[serde(default)]
    pub docstatus: Option<String>,
    /// FHIR id of the encounter that holds the document data.
    #[serde(default)]
    pub encounter: Option<String>,
    /// When the documented service took place (YYYY-MM-DD or range).
    #[serde(default)]
    pub period: Option<String>,
}

/// Searches the bound patient's clinical-note references, following
/// pagination to the end of the upstream result set.
pub struct DocumentReferenceSearchTool {
    client: Arc<FhirClient>,
}

impl DocumentReferenceSearchTool {
    /// Binds the tool to a patient-scoped client.
    #[must_use]
    pub fn new(client: Arc<FhirClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DocumentReferenceSearchTool {
    fn name(&self) -> &'static str {
        DOCUMENT_REFERENCE_SEARCH
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Should always be \"clinical-note\" for clinical notes. Either category or type is required."
                },
                "type": {
                    "type": "string",
                    "description": "The LOINC code for the document type (e.g. 11506-3 for Progress Note). Either category or type is required."
                },
                "date": {
                    "type": "string",
                    "description": "When the document reference was created (YYYY-MM-DD or date range)"
                },
                "docstatus": {
                    "type": "string",
                    "description": "The status: preliminary, final, amended, or entered-in-error"
                },
                "encounter": {
                    "type": "string",
                    "description": "The encounter FHIR ID that holds the DocumentReference data"
                },
                "period": {
                    "type": "string",
                    "description": "When the service was documented (YYYY-MM-DD or date range)"
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: DocumentReferenceSearchParams =
            parse_params(DOCUMENT_REFERENCE_SEARCH, params)?;

        let mut search = SearchParams::new();
        search.push("patient", self.client.patient_id());
        search.push_opt("category", params.category);
        search.push_opt("type", params.doc_type);
        search.push_opt("date", params.date);
        search.push_opt("docstatus", params.docstatus);
        search.push_opt("encounter", params.encounter);
        search.push_opt("period", params.period);

        let documents: Vec<Resource> = self
            .client
            .search_all("DocumentReference", &search)
            .try_collect()
            .await?;
        Ok(Value::Array(
            documents.into_iter().map(Resource::into_json).collect(),
        ))
    }
}
