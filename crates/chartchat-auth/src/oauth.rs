//! Authorization-code flow against the provider's OAuth2 endpoints.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::AuthError;
use crate::provider::EpicProviderConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Tokens produced by a completed code exchange.
///
/// Owned by the session that produced it; this layer never persists it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    /// Bearer credential for the FHIR API and the profile endpoint.
    pub access_token: String,

    /// The id token (compact JWT). Absent when `openid` was not granted.
    #[serde(default)]
    pub id_token: Option<String>,

    /// The token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,

    /// Access-token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth error response from the provider.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    error_description: Option<String>,
}

/// Runnable client for the Epic provider: builds the authorization
/// redirect, exchanges codes for tokens, and resolves identities.
pub struct EpicProvider {
    config: EpicProviderConfig,
    pub(crate) http: reqwest::Client,
}

impl EpicProvider {
    /// Creates a provider client from its configuration.
    #[must_use]
    pub fn new(config: EpicProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, http }
    }

    /// The provider configuration.
    #[must_use]
    pub fn config(&self) -> &EpicProviderConfig {
        &self.config
    }

    /// Builds the authorization redirect URL.
    ///
    /// Carries the FHIR audience the resulting access token must be
    /// usable against; Epic rejects authorize requests without it.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.config.authorization_url())?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("aud", &self.config.audience());

        tracing::debug!(
            "Generated authorization URL for provider {}: {}",
            self.config.provider_id,
            url.as_str().split('?').next().unwrap_or("")
        );
        Ok(url)
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, AuthError> {
        let token_url = self.config.token_url();

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.config.client_id.as_str()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        tracing::debug!("Exchanging authorization code at {token_url}");
        let response = self.http.post(&token_url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if let Ok(oauth) = serde_json::from_str::<OAuthErrorBody>(&body) {
                return Err(AuthError::oauth(
                    oauth.error,
                    oauth.error_description.unwrap_or_default(),
                ));
            }
            return Err(AuthError::TokenExchangeFailed(format!(
                "HTTP {status} - {body}"
            )));
        }

        let tokens: TokenSet = response.json().await.map_err(|e| {
            AuthError::TokenExchangeFailed(format!("Failed to parse token response: {e}"))
        })?;
        Ok(tokens)
    }
}
