//! Advisory validation of proposed architectures.
//!
//! Validation never blocks a recommendation; it produces warnings the
//! caller logs and may surface to the user.

use super::{ServiceCatalog, ServiceChoice};

/// A single advisory finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Service the warning is about.
    pub service: String,
    pub message: String,
}

impl ValidationWarning {
    fn new(service: &str, message: String) -> Self {
        Self {
            service: service.to_string(),
            message,
        }
    }
}

/// Validates service choices against the catalog.
#[derive(Debug, Clone, Default)]
pub struct ArchitectureValidator {
    catalog: ServiceCatalog,
}

impl ArchitectureValidator {
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self { catalog }
    }

    /// Checks existence, category agreement, and common dependencies.
    pub fn validate(&self, services: &[ServiceChoice]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for choice in services {
            let Some(entry) = self.catalog.get(&choice.name) else {
                warnings.push(ValidationWarning::new(
                    &choice.name,
                    format!("unknown service '{}' not found in catalog", choice.name),
                ));
                continue;
            };

            if entry.category != choice.category {
                warnings.push(ValidationWarning::new(
                    &choice.name,
                    format!(
                        "category '{}' does not match catalog category '{}'",
                        choice.category.as_str(),
                        entry.category.as_str()
                    ),
                ));
            }

            for dependency in &entry.common_dependencies {
                let present = services
                    .iter()
                    .any(|other| other.name.eq_ignore_ascii_case(dependency));
                if !present {
                    warnings.push(ValidationWarning::new(
                        &choice.name,
                        format!(
                            "'{}' is commonly deployed with '{}', which is absent",
                            choice.name, dependency
                        ),
                    ));
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::ServiceCategory;

    fn validator() -> ArchitectureValidator {
        ArchitectureValidator::new(ServiceCatalog::embedded())
    }

    #[test]
    fn unknown_service_yields_warning_not_error() {
        let services = vec![ServiceChoice::new(
            "QuantumDB",
            ServiceCategory::Database,
            "experimental store",
        )];
        let warnings = validator().validate(&services);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("unknown service"));
    }

    #[test]
    fn category_mismatch_is_flagged() {
        let services = vec![
            ServiceChoice::new("S3", ServiceCategory::Database, "file store"),
            ServiceChoice::new("IAM", ServiceCategory::Security, "access control"),
        ];
        let warnings = validator().validate(&services);
        assert!(warnings
            .iter()
            .any(|w| w.service == "S3" && w.message.contains("does not match")));
    }

    #[test]
    fn missing_common_dependency_is_flagged() {
        let services = vec![ServiceChoice::new(
            "EC2",
            ServiceCategory::Compute,
            "web server",
        )];
        let warnings = validator().validate(&services);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("'VPC'") && w.service == "EC2"));
    }

    #[test]
    fn complete_architecture_passes_clean() {
        let services = vec![
            ServiceChoice::new("EC2", ServiceCategory::Compute, "web server"),
            ServiceChoice::new("VPC", ServiceCategory::Networking, "network"),
            ServiceChoice::new("IAM", ServiceCategory::Security, "access control"),
        ];
        assert!(validator().validate(&services).is_empty());
    }
}
