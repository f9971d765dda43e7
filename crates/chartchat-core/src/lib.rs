pub mod bundle;
pub mod patient;
pub mod resource;

pub use bundle::{Bundle, BundleEntry, BundleLink};
pub use patient::{ContactPoint, HumanName, PatientProfile};
pub use resource::Resource;
