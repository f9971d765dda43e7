//! Patient-scoped access to the upstream FHIR R4 API.

pub mod client;
pub mod error;
mod pages;
pub mod params;

pub use client::{FhirClient, FhirClientOptions};
pub use error::FhirError;
pub use params::{SearchParams, ServiceCategory};
