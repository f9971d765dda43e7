//! Search-response bundle envelope.

use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// A pagination link attached to a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleLink {
    /// Link relation tag (`self`, `next`, `previous`, ...).
    pub relation: String,
    /// Absolute URL supplied by the upstream.
    pub url: String,
}

/// One entry of a bundle. The resource payload may be absent in sparse
/// bundles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(rename = "fullUrl", default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

/// One page of search results: an ordered entry list plus pagination
/// links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// URL of the `next` pagination link, if the upstream provided one.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == "next")
            .map(|l| l.url.as_str())
    }

    /// Iterates the entries' resources in upstream order, skipping entries
    /// without a payload. Sparse bundles are valid upstream output and
    /// never fail the page.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }

    /// Consumes the bundle into its resources, in upstream order.
    #[must_use]
    pub fn into_resources(self) -> Vec<Resource> {
        self.entry.into_iter().filter_map(|e| e.resource).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_bundle() -> Bundle {
        serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 3,
            "link": [
                {"relation": "self", "url": "https://fhir.example.com/Encounter?patient=p1"},
                {"relation": "next", "url": "https://fhir.example.com/Encounter?cursor=abc"}
            ],
            "entry": [
                {"fullUrl": "https://fhir.example.com/Encounter/1",
                 "resource": {"resourceType": "Encounter", "id": "1"}},
                {"fullUrl": "https://fhir.example.com/Encounter/2"},
                {"resource": {"resourceType": "Encounter", "id": "3"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_next_link() {
        let bundle = sample_bundle();
        assert_eq!(
            bundle.next_link(),
            Some("https://fhir.example.com/Encounter?cursor=abc")
        );
    }

    #[test]
    fn test_next_link_absent() {
        let bundle: Bundle = serde_json::from_value(json!({
            "type": "searchset",
            "link": [{"relation": "self", "url": "https://fhir.example.com/Encounter"}]
        }))
        .unwrap();
        assert_eq!(bundle.next_link(), None);
    }

    #[test]
    fn test_resources_drops_empty_entries() {
        let bundle = sample_bundle();
        let ids: Vec<_> = bundle.resources().filter_map(Resource::id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_into_resources_preserves_order() {
        let ids: Vec<String> = sample_bundle()
            .into_resources()
            .iter()
            .filter_map(|r| r.id().map(String::from))
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_empty_bundle() {
        let bundle: Bundle = serde_json::from_value(json!({"type": "searchset"})).unwrap();
        assert_eq!(bundle.resources().count(), 0);
        assert_eq!(bundle.next_link(), None);
    }
}
