//! Error types for the patient-scoped FHIR client.

use chartchat_auth::AuthError;

/// Errors from the patient-scoped FHIR client.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    /// The id token could not establish a patient identity.
    #[error("Invalid identity token: {0}")]
    InvalidIdentityToken(#[source] AuthError),

    /// The requested resource does not exist upstream.
    #[error("Resource not found: {resource_type}/{id}")]
    ResourceNotFound {
        /// FHIR resource type of the missing resource.
        resource_type: String,
        /// Logical id of the missing resource.
        id: String,
    },

    /// The upstream API rejected the call.
    #[error("Upstream FHIR error (HTTP {status}): {message}")]
    Upstream {
        /// HTTP status returned by the upstream.
        status: u16,
        /// Diagnostics extracted from the response body.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream response body could not be parsed.
    #[error("Failed to parse upstream response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Failed to parse a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl FhirError {
    /// Creates a `ResourceNotFound` error.
    #[must_use]
    pub fn resource_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an `Upstream` error.
    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` if the error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Returns `true` if the error came from the upstream API or the
    /// network rather than this client.
    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Network(_))
    }
}
