//! Tool adapters exposed to the AI orchestration loop.
//!
//! Each adapter wraps one resource-query capability of the patient-scoped
//! FHIR client behind a stable name, a capability description, and a JSON
//! parameter schema. Parameters are validated before execution; invalid
//! shapes never reach the client, and an empty result is an empty array,
//! never an error.

pub mod adverse_events;
pub mod appointments;
pub mod documents;
pub mod encounters;
pub mod error;
pub mod registry;

pub use adverse_events::AdverseEventReadTool;
pub use appointments::AppointmentSearchTool;
pub use documents::DocumentReferenceSearchTool;
pub use encounters::EncounterSearchTool;
pub use error::ToolError;
pub use registry::{Tool, ToolDescriptor, ToolRegistry};
