//! Embedded cloud service catalog.
//!
//! A small knowledge base of well-known services used for advisory
//! validation and prompt grounding. Loaded once; an external catalog
//! file can replace the default set at construction.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::ServiceCategory;

/// Metadata for one catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub display_name: String,
    pub category: ServiceCategory,
    pub description: String,
    /// Services this one is commonly deployed with.
    pub common_dependencies: Vec<String>,
}

impl CatalogEntry {
    fn new(
        name: &str,
        display_name: &str,
        category: ServiceCategory,
        description: &str,
        common_dependencies: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            category,
            description: description.to_string(),
            common_dependencies: common_dependencies.iter().map(|s| s.to_string()).collect(),
        }
    }
}

static DEFAULT_ENTRIES: Lazy<Vec<CatalogEntry>> = Lazy::new(|| {
    use ServiceCategory::*;
    vec![
        CatalogEntry::new(
            "EC2",
            "Amazon Elastic Compute Cloud",
            Compute,
            "Virtual servers in the cloud",
            &["VPC", "IAM"],
        ),
        CatalogEntry::new(
            "Lambda",
            "AWS Lambda",
            Compute,
            "Serverless function execution",
            &["IAM"],
        ),
        CatalogEntry::new(
            "S3",
            "Amazon Simple Storage Service",
            Storage,
            "Object storage with high durability",
            &["IAM"],
        ),
        CatalogEntry::new(
            "EBS",
            "Amazon Elastic Block Store",
            Storage,
            "Block storage volumes for EC2",
            &["EC2"],
        ),
        CatalogEntry::new(
            "RDS",
            "Amazon Relational Database Service",
            Database,
            "Managed relational databases",
            &["VPC"],
        ),
        CatalogEntry::new(
            "DynamoDB",
            "Amazon DynamoDB",
            Database,
            "Managed key-value and document database",
            &["IAM"],
        ),
        CatalogEntry::new(
            "ElastiCache",
            "Amazon ElastiCache",
            Database,
            "Managed in-memory cache",
            &["VPC"],
        ),
        CatalogEntry::new(
            "ELB",
            "Elastic Load Balancing",
            Networking,
            "Traffic distribution across targets",
            &["VPC"],
        ),
        CatalogEntry::new(
            "CloudFront",
            "Amazon CloudFront",
            Networking,
            "Content delivery network",
            &[],
        ),
        CatalogEntry::new(
            "VPC",
            "Amazon Virtual Private Cloud",
            Networking,
            "Isolated virtual network",
            &[],
        ),
        CatalogEntry::new(
            "Route 53",
            "Amazon Route 53",
            Networking,
            "Managed DNS",
            &[],
        ),
        CatalogEntry::new(
            "API Gateway",
            "Amazon API Gateway",
            Networking,
            "Managed API front door",
            &["IAM"],
        ),
        CatalogEntry::new(
            "IAM",
            "AWS Identity and Access Management",
            Security,
            "Identity and permission management",
            &[],
        ),
        CatalogEntry::new(
            "CloudWatch",
            "Amazon CloudWatch",
            Monitoring,
            "Metrics, logs, and alarms",
            &[],
        ),
    ]
});

/// Catalog of known services, keyed by name.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl ServiceCatalog {
    /// Builds the default embedded catalog.
    pub fn embedded() -> Self {
        Self::from_entries(DEFAULT_ENTRIES.clone())
    }

    /// Builds a catalog from explicit entries (e.g. loaded from file).
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        }
    }

    /// Looks up a service by name; exact match first, then
    /// case-insensitive.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        if let Some(entry) = self.entries.get(name) {
            return Some(entry);
        }
        self.entries
            .values()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// Returns true when the service exists in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All known service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_knows_core_services() {
        let catalog = ServiceCatalog::embedded();
        for name in ["EC2", "RDS", "S3", "VPC", "IAM", "CloudWatch"] {
            assert!(catalog.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn lookup_falls_back_to_case_insensitive() {
        let catalog = ServiceCatalog::embedded();
        assert_eq!(catalog.get("ec2").unwrap().name, "EC2");
        assert_eq!(catalog.get("dynamodb").unwrap().name, "DynamoDB");
        assert!(catalog.get("Mainframe").is_none());
    }

    #[test]
    fn entries_carry_common_dependencies() {
        let catalog = ServiceCatalog::embedded();
        let ec2 = catalog.get("EC2").unwrap();
        assert!(ec2.common_dependencies.contains(&"VPC".to_string()));
        assert_eq!(ec2.category, ServiceCategory::Compute);
    }
}
