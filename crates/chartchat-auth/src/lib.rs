//! Identity layer for chartchat: the Epic OAuth2 provider adapter,
//! id-token claims decoding, and post-login identity resolution.

pub mod claims;
pub mod error;
pub mod identity;
pub mod oauth;
pub mod provider;

pub use claims::IdTokenClaims;
pub use error::AuthError;
pub use identity::ResolvedIdentity;
pub use oauth::{EpicProvider, TokenSet};
pub use provider::{DEFAULT_BASE_URL, EpicProviderConfig};
