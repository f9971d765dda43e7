//! Integration tests for tool dispatch against a mock FHIR server.

use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use time::OffsetDateTime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chartchat_fhir::{FhirClient, FhirClientOptions};
use chartchat_tools::{ToolError, ToolRegistry};

fn id_token(issuer: &str, subject: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "iss": issuer,
            "sub": subject,
            "exp": OffsetDateTime::now_utc().unix_timestamp() + 3600,
        })
        .to_string(),
    );
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

fn registry_for(server: &MockServer, patient: &str) -> ToolRegistry {
    let client = FhirClient::new(FhirClientOptions {
        access_token: "access-1".to_string(),
        id_token: id_token(&server.uri(), patient),
    })
    .unwrap();
    ToolRegistry::for_client(Arc::new(client))
}

#[tokio::test]
async fn standard_registry_lists_all_four_tools() {
    let server = MockServer::start().await;
    let registry = registry_for(&server, "patient-1");

    let names: Vec<_> = registry.descriptors().iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![
            "read_adverse_event",
            "search_appointments",
            "search_document_references",
            "search_encounters",
        ]
    );
    for descriptor in registry.descriptors() {
        assert!(!descriptor.description.is_empty());
        assert_eq!(descriptor.parameters["type"], "object");
        assert_eq!(descriptor.parameters["additionalProperties"], false);
    }
}

#[tokio::test]
async fn appointment_dispatch_hits_upstream_with_bound_patient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/FHIR/R4/Appointment"))
        .and(query_param("date", "2024-06-01"))
        .and(query_param("patient", "patient-1"))
        .and(query_param("service-category", "appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [{"resource": {"resourceType": "Appointment", "id": "apt-1"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, "patient-1");
    let result = registry
        .dispatch(
            "search_appointments",
            json!({"date": "2024-06-01", "serviceCategory": "appointment"}),
        )
        .await
        .unwrap();

    assert_json_eq!(
        result,
        json!([{"resourceType": "Appointment", "id": "apt-1"}])
    );
}

#[tokio::test]
async fn invalid_parameters_fail_before_any_network_call() {
    let server = MockServer::start().await;
    let registry = registry_for(&server, "patient-1");

    let err = registry
        .dispatch(
            "search_appointments",
            json!({"date": "2024-06-01", "serviceCategory": "appointment", "patient": "patient-2"}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidParams { .. }));
    assert!(err.is_validation_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn encounter_dispatch_drains_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/FHIR/R4/Encounter"))
        .and(query_param("patient", "patient-1"))
        .and(query_param("status", "finished"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "link": [{"relation": "next", "url": format!("{}/page2", server.uri())}],
            "entry": [{"resource": {"resourceType": "Encounter", "id": "enc-1"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [{"resource": {"resourceType": "Encounter", "id": "enc-2"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, "patient-1");
    let result = registry
        .dispatch("search_encounters", json!({"status": "finished"}))
        .await
        .unwrap();

    let ids: Vec<_> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["enc-1", "enc-2"]);
}

#[tokio::test]
async fn empty_result_is_an_empty_array_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/FHIR/R4/DocumentReference"))
        .and(query_param("category", "clinical-note"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "type": "searchset"
        })))
        .mount(&server)
        .await;

    let registry = registry_for(&server, "patient-1");
    let result = registry
        .dispatch(
            "search_document_references",
            json!({"category": "clinical-note"}),
        )
        .await
        .unwrap();

    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn adverse_event_read_maps_missing_resource_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/FHIR/R4/AdverseEvent/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let registry = registry_for(&server, "patient-1");
    let err = registry
        .dispatch("read_adverse_event", json!({"id": "missing"}))
        .await
        .unwrap_err();

    match err {
        ToolError::Fhir(fhir) => assert!(fhir.is_not_found()),
        other => panic!("expected Fhir error, got {other:?}"),
    }
    assert!(!ToolError::Fhir(chartchat_fhir::FhirError::upstream(500, "x")).is_validation_error());
}

#[tokio::test]
async fn adverse_event_read_returns_the_resource() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/FHIR/R4/AdverseEvent/ae-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "AdverseEvent",
            "id": "ae-9",
            "actuality": "actual",
            "severity": {"coding": [{"code": "moderate"}]}
        })))
        .mount(&server)
        .await;

    let registry = registry_for(&server, "patient-1");
    let result = registry
        .dispatch("read_adverse_event", json!({"id": "ae-9"}))
        .await
        .unwrap();

    assert_eq!(result["resourceType"], "AdverseEvent");
    assert_eq!(result["severity"]["coding"][0]["code"], "moderate");
}
