//! Error types for token decoding and identity resolution.

/// Errors that can occur while decoding tokens or resolving an identity.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token payload could not be decoded as structured data.
    #[error("Malformed identity token")]
    MalformedToken,

    /// A required claim is absent or empty.
    #[error("Missing required claim: {0}")]
    MissingRequiredClaim(&'static str),

    /// The token's expiry is in the past.
    #[error("Identity token has expired")]
    TokenExpired,

    /// The token set carried no id token.
    #[error("No ID token provided")]
    MissingIdentityToken,

    /// Code-for-token exchange with the provider failed.
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The provider returned an OAuth error body.
    #[error("OAuth error from provider: {error} - {description}")]
    OAuth {
        /// The OAuth error code.
        error: String,
        /// Optional error description.
        description: String,
    },

    /// The profile fetch that completes identity resolution failed.
    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl AuthError {
    /// Creates an `OAuth` error from a provider response.
    #[must_use]
    pub fn oauth(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self::OAuth {
            error: error.into(),
            description: description.into(),
        }
    }

    /// Creates a `ProfileFetchFailed` error.
    #[must_use]
    pub fn profile_fetch(message: impl Into<String>) -> Self {
        Self::ProfileFetchFailed(message.into())
    }

    /// Returns `true` for token-shape errors raised before any network
    /// call.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken
                | Self::MissingRequiredClaim(_)
                | Self::TokenExpired
                | Self::MissingIdentityToken
        )
    }

    /// Returns `true` if this is a network or provider-side error.
    #[must_use]
    pub fn is_external_error(&self) -> bool {
        matches!(
            self,
            Self::TokenExchangeFailed(_)
                | Self::OAuth { .. }
                | Self::ProfileFetchFailed(_)
                | Self::Network(_)
        )
    }
}
