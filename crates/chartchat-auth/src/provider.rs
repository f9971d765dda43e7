//! Epic identity-provider configuration.

use serde::{Deserialize, Serialize};

/// Base URL of Epic's public OAuth2 sandbox.
pub const DEFAULT_BASE_URL: &str = "https://fhir.epic.com/interconnect-fhir-oauth";

fn default_scopes() -> Vec<String> {
    vec!["openid".to_string(), "fhirUser".to_string()]
}

/// Configuration for the Epic OAuth2 identity provider.
///
/// Endpoint URLs are derived deterministically from the base URL: the
/// authorization endpoint at `{base}/oauth2/authorize`, the token endpoint
/// at `{base}/oauth2/token`, and the audience advertised on the authorize
/// redirect at `{base}/api/fhir/r4`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicProviderConfig {
    /// Identifier for this provider in the embedding application.
    pub provider_id: String,

    /// Root of the provider's OAuth2 deployment.
    pub base_url: String,

    /// OAuth client ID registered with the provider.
    pub client_id: String,

    /// OAuth client secret (None for public clients).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// OAuth scopes to request (default: `openid fhirUser`).
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl EpicProviderConfig {
    /// Creates a configuration for the default Epic deployment.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            provider_id: "epic".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: client_id.into(),
            client_secret: None,
            scopes: default_scopes(),
        }
    }

    /// Points the provider at a different deployment base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Replaces the requested scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a scope to the existing scopes.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// The derived authorization endpoint.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!("{}/oauth2/authorize", self.base_url)
    }

    /// The derived token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.base_url)
    }

    /// The FHIR audience the issued access token must be usable against.
    #[must_use]
    pub fn audience(&self) -> String {
        format!("{}/api/fhir/r4", self.base_url)
    }

    /// Returns `true` if this provider uses a confidential client.
    #[must_use]
    pub fn is_confidential(&self) -> bool {
        self.client_secret.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EpicProviderConfig::new("client-123");

        assert_eq!(config.provider_id, "epic");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client_id, "client-123");
        assert_eq!(config.scopes, vec!["openid", "fhirUser"]);
        assert!(!config.is_confidential());
    }

    #[test]
    fn test_endpoint_derivation() {
        let config = EpicProviderConfig::new("c").with_base_url("https://example.org/fhir");

        assert_eq!(
            config.authorization_url(),
            "https://example.org/fhir/oauth2/authorize"
        );
        assert_eq!(config.token_url(), "https://example.org/fhir/oauth2/token");
        assert_eq!(config.audience(), "https://example.org/fhir/api/fhir/r4");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = EpicProviderConfig::new("c").with_base_url("https://example.org/fhir/");
        assert_eq!(
            config.authorization_url(),
            "https://example.org/fhir/oauth2/authorize"
        );
    }

    #[test]
    fn test_builder() {
        let config = EpicProviderConfig::new("c")
            .with_client_secret("s3cret")
            .with_scopes(vec!["openid", "fhirUser"])
            .with_scope("launch/patient");

        assert!(config.is_confidential());
        assert_eq!(config.scopes, vec!["openid", "fhirUser", "launch/patient"]);
    }

    #[test]
    fn test_serialization_defaults_scopes() {
        let json = r#"{"provider_id":"epic","base_url":"https://x","client_id":"c"}"#;
        let config: EpicProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.scopes, vec!["openid", "fhirUser"]);
        assert!(config.client_secret.is_none());
    }
}
