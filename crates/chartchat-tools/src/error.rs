//! Error types for tool dispatch.

use chartchat_fhir::FhirError;

/// Errors surfaced to the orchestration loop by tool invocations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The supplied parameters do not match the tool's schema. Raised
    /// before any network call.
    #[error("Invalid parameters for tool '{tool}': {message}")]
    InvalidParams {
        /// Name of the tool that rejected the parameters.
        tool: String,
        /// Why deserialization failed.
        message: String,
    },

    /// The underlying FHIR call failed.
    #[error(transparent)]
    Fhir(#[from] FhirError),
}

impl ToolError {
    /// Creates an `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised before any upstream call.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::InvalidParams { .. })
    }
}
