//! Id-token claims decoding.
//!
//! Tokens arrive directly from the provider's token endpoint over TLS
//! during the code exchange, and this layer trusts that delivery: only the
//! payload segment is parsed, and the signature is NOT verified against
//! the issuer's published keys. A caller that accepts tokens from a less
//! trusted channel must verify signatures before handing them here.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AuthError;

/// Claims carried in the provider's id token.
///
/// Immutable once decoded; `iss` and `sub` are always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Issuer identifier. Doubles as the root of the FHIR endpoint for
    /// this provider.
    pub iss: String,

    /// Subject identifier: the authenticated patient's FHIR id.
    pub sub: String,

    /// Audience the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued-at time (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Absolute URL of the authenticated user's FHIR resource.
    #[serde(rename = "fhirUser", default, skip_serializing_if = "Option::is_none")]
    pub fhir_user: Option<String>,
}

/// Payload shape before required-claim checks.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    aud: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(rename = "fhirUser", default)]
    fhir_user: Option<String>,
}

impl IdTokenClaims {
    /// Decodes the payload segment of a compact token.
    ///
    /// Fails with [`AuthError::MalformedToken`] when the token is not
    /// three dot-separated segments or the payload is not base64url JSON,
    /// and with [`AuthError::MissingRequiredClaim`] when `iss`, `sub`, or
    /// `exp` is absent or empty. Expiry is checked separately by
    /// [`IdTokenClaims::validate`].
    pub fn decode(token: &str) -> Result<Self, AuthError> {
        let payload = payload_segment(token)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::MalformedToken)?;
        let raw: RawClaims =
            serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)?;

        let iss = raw
            .iss
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingRequiredClaim("iss"))?;
        let sub = raw
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingRequiredClaim("sub"))?;
        let exp = raw.exp.ok_or(AuthError::MissingRequiredClaim("exp"))?;

        Ok(Self {
            iss,
            sub,
            aud: raw.aud,
            exp,
            iat: raw.iat,
            fhir_user: raw.fhir_user,
        })
    }

    /// Returns `true` if the claims were expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.exp <= now.unix_timestamp()
    }

    /// Rejects claims whose expiry has passed.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired_at(OffsetDateTime::now_utc()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(())
    }
}

fn payload_segment(token: &str) -> Result<&str, AuthError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedToken);
    };
    if parts.next().is_some() {
        return Err(AuthError::MalformedToken);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_token(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    fn future_exp() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp() + 3600
    }

    #[test]
    fn test_decode_valid_token() {
        let token = encode_token(&json!({
            "iss": "https://fhir.example.com/oauth",
            "sub": "patient-123",
            "aud": "https://fhir.example.com/oauth/api/fhir/r4",
            "exp": future_exp(),
            "iat": 1_700_000_000,
            "fhirUser": "https://fhir.example.com/oauth/api/FHIR/R4/Patient/patient-123"
        }));

        let claims = IdTokenClaims::decode(&token).unwrap();
        assert_eq!(claims.iss, "https://fhir.example.com/oauth");
        assert_eq!(claims.sub, "patient-123");
        assert_eq!(claims.iat, Some(1_700_000_000));
        assert!(claims.fhir_user.as_deref().unwrap().ends_with("patient-123"));
        claims.validate().unwrap();
    }

    #[test]
    fn test_decode_missing_issuer() {
        let token = encode_token(&json!({"sub": "p", "exp": future_exp()}));
        let err = IdTokenClaims::decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::MissingRequiredClaim("iss")));
    }

    #[test]
    fn test_decode_empty_subject() {
        let token = encode_token(&json!({"iss": "https://x", "sub": "", "exp": future_exp()}));
        let err = IdTokenClaims::decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::MissingRequiredClaim("sub")));
    }

    #[test]
    fn test_decode_missing_expiry() {
        let token = encode_token(&json!({"iss": "https://x", "sub": "p"}));
        let err = IdTokenClaims::decode(&token).unwrap_err();
        assert!(matches!(err, AuthError::MissingRequiredClaim("exp")));
    }

    #[test]
    fn test_decode_wrong_segment_count() {
        for token in ["", "onlyone", "two.segments", "a.b.c.d"] {
            let err = IdTokenClaims::decode(token).unwrap_err();
            assert!(matches!(err, AuthError::MalformedToken), "token: {token}");
        }
    }

    #[test]
    fn test_decode_payload_not_base64() {
        let err = IdTokenClaims::decode("aGVhZGVy.!!!.c2ln").unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[test]
    fn test_decode_payload_not_json() {
        let payload = URL_SAFE_NO_PAD.encode("not json");
        let err = IdTokenClaims::decode(&format!("aGVhZGVy.{payload}.c2ln")).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[test]
    fn test_validate_rejects_expired() {
        let token = encode_token(&json!({
            "iss": "https://x",
            "sub": "p",
            "exp": OffsetDateTime::now_utc().unix_timestamp() - 60
        }));
        let claims = IdTokenClaims::decode(&token).unwrap();
        assert!(matches!(claims.validate(), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_is_expired_at() {
        let claims = IdTokenClaims {
            iss: "https://x".to_string(),
            sub: "p".to_string(),
            aud: None,
            exp: 1_000,
            iat: None,
            fhir_user: None,
        };
        assert!(claims.is_expired_at(OffsetDateTime::from_unix_timestamp(1_000).unwrap()));
        assert!(!claims.is_expired_at(OffsetDateTime::from_unix_timestamp(999).unwrap()));
    }
}
