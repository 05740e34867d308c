//! Architecture recommendation generation.
//!
//! The language model proposes services, configurations, an
//! explanation, and pillar alignment text; the engine owns what must
//! be deterministic: the six-pillar map is always total, the diagram
//! source is generated locally, and the proposal is validated against
//! the service catalog (advisory warnings, never a gate).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::conversation::Message;
use crate::domain::foundation::SessionId;
use crate::domain::recommendation::{
    diagram, ArchitectureValidator, PillarAlignment, Recommendation, ServiceCatalog,
    ServiceCategory, ServiceChoice, ServiceConfig,
};
use crate::domain::requirement::RequirementSet;
use crate::ports::{CompletionRequest, LanguageModel, LanguageModelError};

/// How many recent turns feed the recommendation prompt.
const CONTEXT_TURNS: usize = 5;

/// Recommendation pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("no requirements to recommend from")]
    NoRequirements,

    #[error("recommendation generation failed: {0}")]
    Model(#[from] LanguageModelError),

    #[error("recommendation payload invalid: {0}")]
    InvalidPayload(String),

    #[error("model proposed no services")]
    EmptyProposal,
}

/// Typed intermediate schema for the model's proposal.
#[derive(Debug, Deserialize)]
struct ProposalPayload {
    #[serde(default)]
    services: Vec<ProposedService>,
    #[serde(default)]
    configurations: Vec<ProposedConfig>,
    #[serde(default)]
    explanation: String,
    #[serde(default, alias = "well_architected_alignment")]
    alignment: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ProposedService {
    name: String,
    #[serde(default)]
    category: Option<String>,
    role: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProposedConfig {
    service: String,
    config_type: String,
    value: String,
}

/// Generates candidate architectures from a requirement set.
pub struct RecommendationEngine {
    model: Arc<dyn LanguageModel>,
    catalog: ServiceCatalog,
    validator: ArchitectureValidator,
}

impl RecommendationEngine {
    pub fn new(model: Arc<dyn LanguageModel>, catalog: ServiceCatalog) -> Self {
        let validator = ArchitectureValidator::new(catalog.clone());
        Self {
            model,
            catalog,
            validator,
        }
    }

    /// Produces a recommendation satisfying the requirement set.
    pub async fn recommend(
        &self,
        requirements: &RequirementSet,
        session_id: SessionId,
        recent_context: &[Message],
    ) -> Result<Recommendation, RecommendationError> {
        if requirements.is_empty() {
            return Err(RecommendationError::NoRequirements);
        }

        let request = CompletionRequest::new(
            "You are a cloud solutions architect. Respond with a single \
             JSON object only.",
            self.build_prompt(requirements, recent_context),
        )
        .with_max_tokens(3000);

        let value = self.model.complete_json(request).await?;
        let payload: ProposalPayload = serde_json::from_value(value)
            .map_err(|e| RecommendationError::InvalidPayload(e.to_string()))?;

        if payload.services.is_empty() {
            return Err(RecommendationError::EmptyProposal);
        }

        let services: Vec<ServiceChoice> = payload
            .services
            .into_iter()
            .map(|proposed| self.resolve_service(proposed))
            .collect();

        let configurations: Vec<ServiceConfig> = payload
            .configurations
            .into_iter()
            .map(|config| ServiceConfig::new(config.service, config.config_type, config.value))
            .collect();

        for warning in self.validator.validate(&services) {
            tracing::warn!(
                service = %warning.service,
                warning = %warning.message,
                "architecture validation warning"
            );
        }

        let diagram_source = diagram::flowchart(&services);
        let alignment = PillarAlignment::from_partial(&payload.alignment, &services);

        Ok(Recommendation::new(
            session_id,
            services,
            configurations,
            diagram_source,
            alignment,
            payload.explanation,
        ))
    }

    /// Resolves a proposed service into a typed choice. The category
    /// prefers the catalog's classification over the model's claim.
    fn resolve_service(&self, proposed: ProposedService) -> ServiceChoice {
        let category = self
            .catalog
            .get(&proposed.name)
            .map(|entry| entry.category)
            .or_else(|| {
                proposed
                    .category
                    .as_deref()
                    .and_then(ServiceCategory::parse)
            })
            .unwrap_or(ServiceCategory::Other);

        let mut choice = ServiceChoice::new(proposed.name, category, proposed.role)
            .with_dependencies(proposed.depends_on);
        if let Some(region) = proposed.region {
            choice = choice.with_region(region);
        }
        choice
    }

    fn build_prompt(&self, requirements: &RequirementSet, recent_context: &[Message]) -> String {
        let mut prompt = String::new();

        if !recent_context.is_empty() {
            prompt.push_str("Previous conversation:\n");
            let skip = recent_context.len().saturating_sub(CONTEXT_TURNS);
            for message in &recent_context[skip..] {
                prompt.push_str(message.role().as_str());
                prompt.push_str(": ");
                prompt.push_str(message.content());
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        prompt.push_str("User requirements:\n");
        for requirement in requirements.items() {
            prompt.push_str(&format!(
                "- {}: {}\n",
                requirement.category(),
                requirement.value()
            ));
        }

        prompt.push_str(&format!(
            "\nKnown services: {}\n",
            self.catalog.service_names().join(", ")
        ));

        prompt.push_str(
            "\nPropose an architecture satisfying the requirements. Return \
             JSON of the form:\n\
             {\"services\": [{\"name\": \"EC2\", \"category\": \"compute\", \
             \"role\": \"web server\", \"region\": \"us-east-1\", \
             \"depends_on\": [\"VPC\"]}], \
             \"configurations\": [{\"service\": \"EC2\", \
             \"config_type\": \"instance_type\", \"value\": \"t3.medium\"}], \
             \"explanation\": \"...\", \
             \"alignment\": {\"security\": \"...\"}}",
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MessageId;
    use crate::domain::recommendation::PILLARS;
    use crate::domain::requirement::{Requirement, RequirementCategory};
    use async_trait::async_trait;

    struct ScriptedModel {
        response: Result<String, LanguageModelError>,
    }

    impl ScriptedModel {
        fn returning(json: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(json.to_string()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<String, LanguageModelError> {
            self.response.clone()
        }
    }

    fn requirements() -> RequirementSet {
        let session_id = SessionId::new();
        let mut set = RequirementSet::new();
        set.insert(Requirement::new(
            session_id,
            RequirementCategory::ApplicationType,
            "e-commerce site",
            0.9,
            Some(MessageId::new()),
        ));
        set.insert(Requirement::new(
            session_id,
            RequirementCategory::Scale,
            "1000 users",
            0.9,
            None,
        ));
        set
    }

    const PROPOSAL: &str = r#"{
        "services": [
            {"name": "EC2", "role": "web server", "depends_on": ["ELB"]},
            {"name": "ELB", "role": "load balancer"},
            {"name": "RDS", "role": "primary database"}
        ],
        "configurations": [
            {"service": "EC2", "config_type": "instance_type", "value": "t3.medium"}
        ],
        "explanation": "Load-balanced web tier with a managed database.",
        "alignment": {"security": "Security groups restrict database access."}
    }"#;

    #[tokio::test]
    async fn builds_recommendation_with_total_alignment() {
        let engine =
            RecommendationEngine::new(ScriptedModel::returning(PROPOSAL), ServiceCatalog::embedded());

        let rec = engine
            .recommend(&requirements(), SessionId::new(), &[])
            .await
            .unwrap();

        assert_eq!(rec.services().len(), 3);
        assert_eq!(rec.configurations().len(), 1);
        assert!(rec.diagram_source().contains("ELB --> EC2"));
        assert_eq!(
            rec.alignment().security,
            "Security groups restrict database access."
        );
        // Every pillar present even though the model returned one.
        let map = serde_json::to_value(rec.alignment()).unwrap();
        assert_eq!(map.as_object().unwrap().len(), PILLARS.len());
    }

    #[tokio::test]
    async fn catalog_category_overrides_model_claim() {
        let proposal = r#"{
            "services": [{"name": "S3", "category": "database", "role": "asset store"}],
            "explanation": "Object storage."
        }"#;
        let engine = RecommendationEngine::new(
            ScriptedModel::returning(proposal),
            ServiceCatalog::embedded(),
        );

        let rec = engine
            .recommend(&requirements(), SessionId::new(), &[])
            .await
            .unwrap();
        assert_eq!(rec.services()[0].category, ServiceCategory::Storage);
    }

    #[tokio::test]
    async fn unknown_service_falls_back_to_other_category() {
        let proposal = r#"{
            "services": [{"name": "FutureDB", "role": "store"}],
            "explanation": "Experimental."
        }"#;
        let engine = RecommendationEngine::new(
            ScriptedModel::returning(proposal),
            ServiceCatalog::embedded(),
        );

        let rec = engine
            .recommend(&requirements(), SessionId::new(), &[])
            .await
            .unwrap();
        assert_eq!(rec.services()[0].category, ServiceCategory::Other);
    }

    #[tokio::test]
    async fn empty_requirements_are_rejected() {
        let engine =
            RecommendationEngine::new(ScriptedModel::returning(PROPOSAL), ServiceCatalog::embedded());
        let err = engine
            .recommend(&RequirementSet::new(), SessionId::new(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendationError::NoRequirements));
    }

    #[tokio::test]
    async fn proposal_without_services_is_rejected() {
        let engine = RecommendationEngine::new(
            ScriptedModel::returning(r#"{"services": [], "explanation": "none"}"#),
            ServiceCatalog::embedded(),
        );
        let err = engine
            .recommend(&requirements(), SessionId::new(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendationError::EmptyProposal));
    }
}
