//! Patient demographic profile returned by the provider's profile
//! endpoint.

use serde::{Deserialize, Serialize};

/// A human name with a FHIR `use` code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// A contact point (email, phone, ...) with an optional preference rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub contact_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// The subset of a Patient resource the identity layer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
}

impl PatientProfile {
    /// The official-use display name. Other name-use variants are never
    /// substituted; a profile without an official name has no display
    /// name.
    #[must_use]
    pub fn official_name(&self) -> Option<&str> {
        self.name
            .iter()
            .find(|n| n.name_use.as_deref() == Some("official"))
            .and_then(|n| n.text.as_deref())
    }

    /// The preferred email address among `email` contact points.
    ///
    /// The lowest declared rank wins. When no email declares a rank the
    /// first in document order is used; an empty contact list resolves to
    /// no email rather than an error.
    #[must_use]
    pub fn preferred_email(&self) -> Option<&str> {
        let emails: Vec<&ContactPoint> = self
            .telecom
            .iter()
            .filter(|c| c.system.as_deref() == Some("email"))
            .collect();

        emails
            .iter()
            .filter(|c| c.rank.is_some())
            .min_by_key(|c| c.rank)
            .or_else(|| emails.first())
            .and_then(|c| c.value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: serde_json::Value) -> PatientProfile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_official_name_selected() {
        let patient = profile(json!({
            "name": [
                {"use": "nickname", "text": "Sam"},
                {"use": "official", "text": "Samantha Jones"}
            ]
        }));
        assert_eq!(patient.official_name(), Some("Samantha Jones"));
    }

    #[test]
    fn test_no_official_name_means_no_name() {
        let patient = profile(json!({
            "name": [{"use": "usual", "text": "Sam"}]
        }));
        assert_eq!(patient.official_name(), None);
    }

    #[test]
    fn test_email_lowest_rank_wins() {
        let patient = profile(json!({
            "telecom": [
                {"system": "email", "rank": 2, "value": "a@example.com"},
                {"system": "email", "rank": 1, "value": "b@example.com"},
                {"system": "phone", "value": "555-0100"}
            ]
        }));
        assert_eq!(patient.preferred_email(), Some("b@example.com"));
    }

    #[test]
    fn test_email_unranked_falls_back_to_first() {
        let patient = profile(json!({
            "telecom": [
                {"system": "email", "value": "first@example.com"},
                {"system": "email", "value": "second@example.com"}
            ]
        }));
        assert_eq!(patient.preferred_email(), Some("first@example.com"));
    }

    #[test]
    fn test_ranked_email_beats_unranked() {
        let patient = profile(json!({
            "telecom": [
                {"system": "email", "value": "unranked@example.com"},
                {"system": "email", "rank": 3, "value": "ranked@example.com"}
            ]
        }));
        assert_eq!(patient.preferred_email(), Some("ranked@example.com"));
    }

    #[test]
    fn test_no_contacts_means_no_email() {
        let patient = profile(json!({}));
        assert_eq!(patient.preferred_email(), None);
    }

    #[test]
    fn test_non_email_contacts_ignored() {
        let patient = profile(json!({
            "telecom": [{"system": "phone", "rank": 1, "value": "555-0100"}]
        }));
        assert_eq!(patient.preferred_email(), None);
    }
}
