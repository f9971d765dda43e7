//! Patient-scoped FHIR R4 client.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use time::Date;
use url::Url;

use chartchat_auth::IdTokenClaims;
use chartchat_core::{Bundle, Resource};

use crate::error::FhirError;
use crate::params::{SearchParams, ServiceCategory};

const ACCEPT_FHIR_JSON: &str = "application/fhir+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Session tokens used to construct a [`FhirClient`].
#[derive(Debug, Clone)]
pub struct FhirClientOptions {
    /// Bearer credential for the FHIR API.
    pub access_token: String,
    /// Id token carrying the issuer and patient subject claims.
    pub id_token: String,
}

/// Authenticated client bound to a single patient identity.
///
/// The base URL and patient id are derived from the id-token claims at
/// construction and fixed for the client's lifetime: one instance serves
/// exactly one patient and is never reused across identities. No
/// operation accepts a different patient id.
pub struct FhirClient {
    http: reqwest::Client,
    access_token: String,
    base_url: Url,
    patient_id: String,
}

impl FhirClient {
    /// Creates a client from the session's token pair.
    ///
    /// Fails with [`FhirError::InvalidIdentityToken`] when the id token
    /// does not carry valid issuer and subject claims; no
    /// partially-initialized client is ever returned.
    pub fn new(options: FhirClientOptions) -> Result<Self, FhirError> {
        let claims =
            IdTokenClaims::decode(&options.id_token).map_err(FhirError::InvalidIdentityToken)?;
        let base_url = fhir_base_url(&claims.iss)?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            access_token: options.access_token,
            base_url,
            patient_id: claims.sub,
        })
    }

    /// The patient identity this client is bound to.
    #[must_use]
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// The derived FHIR base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn resource_url(&self, resource_type: &str, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("FHIR base URL is always hierarchical");
            path.pop_if_empty().push(resource_type);
            if let Some(id) = id {
                path.push(id);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("Accept", ACCEPT_FHIR_JSON)
            .bearer_auth(&self.access_token)
    }

    /// Reads a single resource by type and id.
    pub async fn read(&self, resource_type: &str, id: &str) -> Result<Resource, FhirError> {
        let url = self.resource_url(resource_type, Some(id));
        tracing::debug!("GET {url}");
        let response = self.request(Method::GET, url).send().await?;

        if matches!(response.status().as_u16(), 404 | 410) {
            return Err(FhirError::resource_not_found(resource_type, id));
        }
        let value = handle_response(response).await?;
        Ok(Resource::from(value))
    }

    /// Fetches one page of search results.
    pub async fn search(
        &self,
        resource_type: &str,
        params: &SearchParams,
    ) -> Result<Bundle, FhirError> {
        let mut url = self.resource_url(resource_type, None);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        self.fetch_bundle(url).await
    }

    /// Fetches a bundle from an absolute URL, as supplied in upstream
    /// pagination links.
    pub(crate) async fn fetch_bundle(&self, url: Url) -> Result<Bundle, FhirError> {
        tracing::debug!("GET {url}");
        let response = self.request(Method::GET, url).send().await?;
        let value = handle_response(response).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Searches the patient's appointments for a date and service
    /// category.
    ///
    /// The `patient` parameter is always this client's own patient id, so
    /// a caller can never query another patient through this method.
    pub async fn get_appointments(
        &self,
        date: Date,
        service_category: ServiceCategory,
    ) -> Result<Vec<Resource>, FhirError> {
        let mut params = SearchParams::new();
        params.push("date", date);
        params.push("patient", &self.patient_id);
        params.push("service-category", service_category);

        let bundle = self.search("Appointment", &params).await?;
        Ok(bundle.into_resources())
    }
}

/// Derives the FHIR R4 base URL from the token issuer.
fn fhir_base_url(issuer: &str) -> Result<Url, FhirError> {
    let issuer = if issuer.ends_with('/') {
        issuer.to_string()
    } else {
        format!("{issuer}/")
    };
    let base = Url::parse(&issuer)?;
    Ok(base.join("api/FHIR/R4/")?)
}

async fn handle_response(response: reqwest::Response) -> Result<Value, FhirError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FhirError::upstream(
            status.as_u16(),
            outcome_message(&body),
        ));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Pulls human-readable diagnostics out of an OperationOutcome body,
/// falling back to the raw body.
fn outcome_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && json.get("resourceType").and_then(Value::as_str) == Some("OperationOutcome")
        && let Some(issues) = json.get("issue").and_then(Value::as_array)
    {
        let msgs: Vec<&str> = issues
            .iter()
            .filter_map(|i| i.get("diagnostics").and_then(Value::as_str))
            .collect();
        if !msgs.is_empty() {
            return msgs.join("; ");
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fhir_base_url_appends_api_path() {
        let url = fhir_base_url("https://fhir.example.com/interconnect").unwrap();
        assert_eq!(
            url.as_str(),
            "https://fhir.example.com/interconnect/api/FHIR/R4/"
        );
    }

    #[test]
    fn test_fhir_base_url_tolerates_trailing_slash() {
        let url = fhir_base_url("https://fhir.example.com/interconnect/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://fhir.example.com/interconnect/api/FHIR/R4/"
        );
    }

    #[test]
    fn test_fhir_base_url_rejects_garbage() {
        assert!(fhir_base_url("not a url").is_err());
    }

    #[test]
    fn test_outcome_message_extracts_diagnostics() {
        let body = r#"{
            "resourceType": "OperationOutcome",
            "issue": [
                {"severity": "error", "diagnostics": "Patient not authorized"},
                {"severity": "warning", "diagnostics": "Partial result"}
            ]
        }"#;
        assert_eq!(
            outcome_message(body),
            "Patient not authorized; Partial result"
        );
    }

    #[test]
    fn test_outcome_message_falls_back_to_body() {
        assert_eq!(outcome_message("plain error"), "plain error");
        assert_eq!(outcome_message(r#"{"other": true}"#), r#"{"other": true}"#);
    }
}
