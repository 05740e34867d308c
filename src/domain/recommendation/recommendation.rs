//! Architecture recommendation aggregate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EstimateId, RecommendationId, SessionId, Timestamp};

/// Category of a cloud service within an architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Compute,
    Storage,
    Database,
    Networking,
    Security,
    Monitoring,
    Other,
}

impl ServiceCategory {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "compute" => Some(ServiceCategory::Compute),
            "storage" => Some(ServiceCategory::Storage),
            "database" => Some(ServiceCategory::Database),
            "networking" => Some(ServiceCategory::Networking),
            "security" => Some(ServiceCategory::Security),
            "monitoring" => Some(ServiceCategory::Monitoring),
            "other" => Some(ServiceCategory::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Compute => "compute",
            ServiceCategory::Storage => "storage",
            ServiceCategory::Database => "database",
            ServiceCategory::Networking => "networking",
            ServiceCategory::Security => "security",
            ServiceCategory::Monitoring => "monitoring",
            ServiceCategory::Other => "other",
        }
    }
}

/// One service chosen for an architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceChoice {
    /// Service name as listed in the catalog (e.g. "EC2", "RDS").
    pub name: String,
    pub category: ServiceCategory,
    /// Role in this architecture (e.g. "web server", "primary database").
    pub role: String,
    pub region: Option<String>,
    /// Names of other chosen services this one depends on.
    pub depends_on: Vec<String>,
}

impl ServiceChoice {
    pub fn new(
        name: impl Into<String>,
        category: ServiceCategory,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            role: role.into(),
            region: None,
            depends_on: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_dependencies(mut self, depends_on: Vec<String>) -> Self {
        self.depends_on = depends_on;
        self
    }
}

/// Configuration attached to one chosen service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the service this configures.
    pub service: String,
    /// Configuration kind (e.g. "instance_type", "storage_size").
    pub config_type: String,
    /// Configured value (e.g. "t3.medium", "100GB").
    pub value: String,
}

impl ServiceConfig {
    pub fn new(
        service: impl Into<String>,
        config_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            config_type: config_type.into(),
            value: value.into(),
        }
    }
}

/// The six architecture-quality pillars.
pub const PILLARS: [&str; 6] = [
    "operational_excellence",
    "security",
    "reliability",
    "performance_efficiency",
    "cost_optimization",
    "sustainability",
];

/// Alignment with the six architecture-quality pillars.
///
/// Total by construction: every pillar field always exists. Text may
/// be empty only if a caller explicitly sets it so; the
/// [`PillarAlignment::from_partial`] constructor synthesizes a default
/// description for any pillar the language model left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarAlignment {
    pub operational_excellence: String,
    pub security: String,
    pub reliability: String,
    pub performance_efficiency: String,
    pub cost_optimization: String,
    pub sustainability: String,
}

impl PillarAlignment {
    /// Builds a total alignment from whatever pillars the language
    /// model returned, filling the rest with synthesized defaults
    /// derived from the chosen services.
    pub fn from_partial(
        partial: &BTreeMap<String, String>,
        services: &[ServiceChoice],
    ) -> Self {
        let pick = |pillar: &str| -> String {
            match partial.get(pillar) {
                Some(text) if !text.trim().is_empty() => text.clone(),
                _ => default_alignment(pillar, services),
            }
        };

        Self {
            operational_excellence: pick("operational_excellence"),
            security: pick("security"),
            reliability: pick("reliability"),
            performance_efficiency: pick("performance_efficiency"),
            cost_optimization: pick("cost_optimization"),
            sustainability: pick("sustainability"),
        }
    }

    /// The alignment as a pillar-name → description map.
    pub fn as_map(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("operational_excellence", self.operational_excellence.as_str()),
            ("security", self.security.as_str()),
            ("reliability", self.reliability.as_str()),
            ("performance_efficiency", self.performance_efficiency.as_str()),
            ("cost_optimization", self.cost_optimization.as_str()),
            ("sustainability", self.sustainability.as_str()),
        ])
    }
}

fn default_alignment(pillar: &str, services: &[ServiceChoice]) -> String {
    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    let joined = if names.is_empty() {
        "the selected services".to_string()
    } else {
        names.join(", ")
    };

    match pillar {
        "operational_excellence" => format!(
            "Managed operations and monitoring hooks are available for {}.",
            joined
        ),
        "security" => format!(
            "Access to {} is governed through identity policies and network isolation.",
            joined
        ),
        "reliability" => format!(
            "{} can be deployed across multiple availability zones for fault tolerance.",
            joined
        ),
        "performance_efficiency" => format!(
            "Instance and capacity options for {} can be tuned to the workload.",
            joined
        ),
        "cost_optimization" => format!(
            "Right-sizing and reserved capacity keep the cost of {} proportional to usage.",
            joined
        ),
        "sustainability" => format!(
            "Scaling {} to demand avoids idle capacity.",
            joined
        ),
        _ => String::new(),
    }
}

/// A recommended candidate architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    id: RecommendationId,
    session_id: SessionId,
    created_at: Timestamp,
    services: Vec<ServiceChoice>,
    configurations: Vec<ServiceConfig>,
    diagram_source: String,
    diagram_url: Option<String>,
    estimate_id: Option<EstimateId>,
    alignment: PillarAlignment,
    explanation: String,
}

impl Recommendation {
    /// Creates a recommendation. The diagram source is generated by
    /// the caller (see [`super::diagram::flowchart`]).
    pub fn new(
        session_id: SessionId,
        services: Vec<ServiceChoice>,
        configurations: Vec<ServiceConfig>,
        diagram_source: String,
        alignment: PillarAlignment,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id: RecommendationId::new(),
            session_id,
            created_at: Timestamp::now(),
            services,
            configurations,
            diagram_source,
            diagram_url: None,
            estimate_id: None,
            alignment,
            explanation: explanation.into(),
        }
    }

    pub fn id(&self) -> &RecommendationId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn services(&self) -> &[ServiceChoice] {
        &self.services
    }

    pub fn configurations(&self) -> &[ServiceConfig] {
        &self.configurations
    }

    pub fn diagram_source(&self) -> &str {
        &self.diagram_source
    }

    pub fn diagram_url(&self) -> Option<&str> {
        self.diagram_url.as_deref()
    }

    pub fn estimate_id(&self) -> Option<&EstimateId> {
        self.estimate_id.as_ref()
    }

    pub fn alignment(&self) -> &PillarAlignment {
        &self.alignment
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Records the rendered diagram location.
    pub fn attach_diagram_url(&mut self, url: impl Into<String>) {
        self.diagram_url = Some(url.into());
    }

    /// Records the associated cost estimate.
    pub fn attach_estimate(&mut self, estimate_id: EstimateId) {
        self.estimate_id = Some(estimate_id);
    }

    /// Configurations belonging to one service.
    pub fn configs_for(&self, service_name: &str) -> Vec<&ServiceConfig> {
        self.configurations
            .iter()
            .filter(|c| c.service == service_name)
            .collect()
    }
}
