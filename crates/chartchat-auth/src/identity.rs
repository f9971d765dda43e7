//! Post-exchange identity resolution.

use chartchat_core::PatientProfile;
use serde::{Deserialize, Serialize};

use crate::claims::IdTokenClaims;
use crate::error::AuthError;
use crate::oauth::{EpicProvider, TokenSet};

/// A verified user profile produced by a completed login.
///
/// Constructed once per login and handed to the session layer; this layer
/// does not retain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// External subject identifier: the patient's FHIR id at the provider.
    pub external_id: String,

    /// Official-use display name, when the profile declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Preferred email address, when any email contact point exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Always `false`: this provider's contact points are not treated as
    /// a verified-email assertion.
    pub email_verified: bool,
}

impl EpicProvider {
    /// Resolves the verified identity behind a completed code exchange.
    ///
    /// Decodes the id-token claims and issues one bearer-authenticated GET
    /// to the profile reference embedded in them. Failures are not
    /// retried: login is a one-shot user-facing step, and silent retries
    /// would mask misconfiguration.
    pub async fn resolve_identity(&self, tokens: &TokenSet) -> Result<ResolvedIdentity, AuthError> {
        let id_token = tokens
            .id_token
            .as_deref()
            .ok_or(AuthError::MissingIdentityToken)?;
        let claims = IdTokenClaims::decode(id_token)?;
        claims.validate()?;

        let profile_url = claims
            .fhir_user
            .as_deref()
            .ok_or(AuthError::MissingRequiredClaim("fhirUser"))?;

        tracing::debug!(subject = %claims.sub, "Fetching patient profile from {profile_url}");
        let response = self
            .http
            .get(profile_url)
            .header("Accept", "application/json")
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| AuthError::profile_fetch(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::profile_fetch(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let profile: PatientProfile = response
            .json()
            .await
            .map_err(|e| AuthError::profile_fetch(format!("Failed to parse profile: {e}")))?;

        let identity = ResolvedIdentity {
            external_id: claims.sub,
            name: profile.official_name().map(str::to_owned),
            email: profile.preferred_email().map(str::to_owned),
            email_verified: false,
        };
        tracing::info!(
            subject = %identity.external_id,
            "Resolved identity via provider {}",
            self.config().provider_id
        );
        Ok(identity)
    }
}
