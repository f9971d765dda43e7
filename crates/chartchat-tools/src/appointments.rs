//! Appointment and surgical-procedure search.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use time::Date;

use chartchat_core::Resource;
use chartchat_fhir::{FhirClient, ServiceCategory};

use crate::error::ToolError;
use crate::registry::{Tool, parse_params};

/// Dispatch name of the appointment search tool.
pub const APPOINTMENT_SEARCH: &str = "search_appointments";

const DESCRIPTION: &str = "\
Searches for appointments and scheduled surgical procedures. Returns the \
patient's up-to-date appointment information, such as the appointment date \
and time, provider, and location.

With the \"appointment\" service category, non-surgical scheduled \
appointments are returned. This might include outpatient clinic \
appointments, radiology appointments, non-interventional cardiology \
appointments, and inpatient hospital appointments occurring as part of an \
admission. It will not include patient-submitted appointment requests that \
have not been scheduled, or appointments scheduled at other health systems.

With the \"surgery\" service category, scheduled surgical procedures are \
returned, including scheduled interventional cardiology visits.";

/// Parameters for [`AppointmentSearchTool`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppointmentSearchParams {
    /// Date the appointments take place.
    pub date: Date,
    /// Appointment or surgery scheduling queue.
    pub service_category: ServiceCategory,
}

/// Searches appointments by date and service category, always scoped to
/// the bound patient.
pub struct AppointmentSearchTool {
    client: Arc<FhirClient>,
}

impl AppointmentSearchTool {
    /// Binds the tool to a patient-scoped client.
    #[must_use]
    pub fn new(client: Arc<FhirClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AppointmentSearchTool {
    fn name(&self) -> &'static str {
        APPOINTMENT_SEARCH
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "string",
                    "format": "date",
                    "description": "Date the appointments take place (YYYY-MM-DD)"
                },
                "serviceCategory": {
                    "type": "string",
                    "enum": ["appointment", "surgery"],
                    "description": "\"appointment\" for non-surgical scheduled appointments, \"surgery\" for scheduled surgical procedures"
                }
            },
            "required": ["date", "serviceCategory"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, ToolError> {
        let params: AppointmentSearchParams = parse_params(APPOINTMENT_SEARCH, params)?;
        let appointments = self
            .client
            .get_appointments(params.date, params.service_category)
            .await?;
        Ok(Value::Array(
            appointments.into_iter().map(Resource::into_json).collect(),
        ))
    }
}
