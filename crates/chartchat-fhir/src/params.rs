//! Search parameter encoding.

use serde::{Deserialize, Serialize};

/// Ordered search parameters for a resource query.
///
/// Absent values are omitted entirely rather than serialized as empty, so
/// an unset filter never reaches the upstream query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.pairs.push((name.into(), value.to_string()));
    }

    /// Appends a parameter when the value is present; `None` is skipped.
    pub fn push_opt<T: ToString>(&mut self, name: impl Into<String>, value: Option<T>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Builder form of [`SearchParams::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// Builder form of [`SearchParams::push_opt`].
    #[must_use]
    pub fn with_opt<T: ToString>(mut self, name: impl Into<String>, value: Option<T>) -> Self {
        self.push_opt(name, value);
        self
    }

    /// Iterates the encoded pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` when no parameter was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of encoded parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Epic appointment service categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    /// Non-surgical scheduled appointments.
    Appointment,
    /// Scheduled surgical procedures.
    Surgery,
}

impl ServiceCategory {
    /// The upstream `service-category` token.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Surgery => "surgery",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
