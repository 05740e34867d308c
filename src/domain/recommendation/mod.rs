//! Recommendation domain: candidate architectures, the service
//! catalog, advisory validation, and diagram source generation.

mod catalog;
pub mod diagram;
mod recommendation;
mod validator;

pub use catalog::{CatalogEntry, ServiceCatalog};
pub use recommendation::{
    PillarAlignment, Recommendation, ServiceCategory, ServiceChoice, ServiceConfig, PILLARS,
};
pub use validator::{ArchitectureValidator, ValidationWarning};
