//! Requirement extraction and merge.
//!
//! Delegates category/value/confidence extraction to the language
//! model, validates the payload at the boundary, and merges new
//! requirements into the session's active set under the value-dedup
//! rule. Extraction failure degrades to "no change" for the turn.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::conversation::Message;
use crate::domain::foundation::{MessageId, SessionId};
use crate::domain::requirement::{Requirement, RequirementCategory, RequirementSet};
use crate::ports::{CompletionRequest, LanguageModel};

/// How many recent turns feed the extraction prompt.
const CONTEXT_TURNS: usize = 5;

/// Default confidence when the model omits one.
const FALLBACK_CONFIDENCE: f64 = 0.8;

/// Typed intermediate schema for the model's extraction output.
#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    #[serde(default)]
    requirements: Vec<ExtractedRequirement>,
}

#[derive(Debug, Deserialize)]
struct ExtractedRequirement {
    #[serde(alias = "category")]
    requirement_type: String,
    #[serde(alias = "value")]
    requirement_value: String,
    confidence: Option<f64>,
}

/// Result of one extraction turn.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// The full merged set after this turn.
    pub merged: RequirementSet,
    /// Only the requirements actually appended this turn.
    pub appended: Vec<Requirement>,
}

/// Extracts requirements from an utterance and merges them with the
/// session's accumulated set.
pub struct RequirementExtractor {
    model: Arc<dyn LanguageModel>,
}

impl RequirementExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Extracts and merges. Never fails: a model error or malformed
    /// payload yields an empty extraction and the set is returned
    /// unchanged.
    pub async fn extract_and_merge(
        &self,
        utterance: &str,
        recent_context: &[Message],
        session_id: SessionId,
        source_message_id: MessageId,
        previous: &RequirementSet,
    ) -> ExtractionOutcome {
        let extracted = match self.extract(utterance, recent_context).await {
            Ok(extracted) => extracted,
            Err(err) => {
                tracing::warn!(error = %err, "requirement extraction degraded to no change");
                Vec::new()
            }
        };

        let mut merged = previous.clone();
        let new_requirements: Vec<Requirement> = extracted
            .into_iter()
            .filter_map(|item| {
                let Some(category) = RequirementCategory::parse(&item.requirement_type) else {
                    tracing::warn!(
                        requirement_type = %item.requirement_type,
                        "skipping requirement with unknown category"
                    );
                    return None;
                };
                Some(Requirement::new(
                    session_id,
                    category,
                    item.requirement_value,
                    item.confidence.unwrap_or(FALLBACK_CONFIDENCE),
                    Some(source_message_id),
                ))
            })
            .collect();

        let appended = merged.merge(new_requirements);
        ExtractionOutcome { merged, appended }
    }

    async fn extract(
        &self,
        utterance: &str,
        recent_context: &[Message],
    ) -> Result<Vec<ExtractedRequirement>, ExtractError> {
        let request = CompletionRequest::new(
            "You are a cloud architecture expert extracting structured \
             requirements. Respond with a single JSON object only.",
            build_prompt(utterance, recent_context),
        );

        let value = self.model.complete_json(request).await?;
        let payload: ExtractionPayload =
            serde_json::from_value(value).map_err(|e| ExtractError::InvalidPayload(e.to_string()))?;
        Ok(payload.requirements)
    }
}

#[derive(Debug, thiserror::Error)]
enum ExtractError {
    #[error("requirement extraction failed: {0}")]
    Model(#[from] crate::ports::LanguageModelError),

    #[error("extraction payload invalid: {0}")]
    InvalidPayload(String),
}

fn build_prompt(utterance: &str, recent_context: &[Message]) -> String {
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

    prompt.push_str("User message: ");
    prompt.push_str(utterance);
    prompt.push_str(
        "\n\nExtract the requirements present. Requirement types:\n\
         1. application_type: kind of application (web app, mobile backend, analytics)\n\
         2. scale: size requirements (user count, data volume, request rate)\n\
         3. constraint: constraints (high availability, security, cost limits)\n\
         4. preference: user preferences (specific region or service)\n\n\
         Return JSON of the form:\n\
         {\"requirements\": [{\"requirement_type\": \"application_type\", \
         \"requirement_value\": \"web application\", \"confidence\": 0.9}]}",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::LanguageModelError;
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

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(LanguageModelError::Timeout { timeout_secs: 30 }),
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

    fn previous(session_id: SessionId, values: &[(&str, RequirementCategory)]) -> RequirementSet {
        let mut set = RequirementSet::new();
        for (value, category) in values {
            set.insert(Requirement::new(session_id, *category, *value, 0.9, None));
        }
        set
    }

    #[tokio::test]
    async fn extracts_and_appends_novel_requirements() {
        let model = ScriptedModel::returning(
            r#"{"requirements": [
                {"requirement_type": "application_type", "requirement_value": "e-commerce site", "confidence": 0.95},
                {"requirement_type": "scale", "requirement_value": "1000 users"}
            ]}"#,
        );
        let extractor = RequirementExtractor::new(model);
        let session_id = SessionId::new();

        let outcome = extractor
            .extract_and_merge(
                "I need a small e-commerce site for about 1000 users",
                &[],
                session_id,
                MessageId::new(),
                &RequirementSet::new(),
            )
            .await;

        assert_eq!(outcome.appended.len(), 2);
        assert_eq!(outcome.merged.len(), 2);
        // Omitted confidence falls back to the default.
        assert_eq!(outcome.appended[1].confidence(), FALLBACK_CONFIDENCE);
        assert_eq!(
            outcome.appended[0].category(),
            RequirementCategory::ApplicationType
        );
    }

    #[tokio::test]
    async fn duplicate_values_are_skipped_on_merge() {
        let session_id = SessionId::new();
        let prior = previous(session_id, &[("1000 users", RequirementCategory::Scale)]);
        let model = ScriptedModel::returning(
            r#"{"requirements": [
                {"requirement_type": "scale", "requirement_value": "1000 users"},
                {"requirement_type": "constraint", "requirement_value": "high availability"}
            ]}"#,
        );

        let outcome = RequirementExtractor::new(model)
            .extract_and_merge("make it highly available", &[], session_id, MessageId::new(), &prior)
            .await;

        assert_eq!(outcome.appended.len(), 1);
        assert_eq!(outcome.appended[0].value(), "high availability");
        assert_eq!(outcome.merged.len(), 2);
    }

    #[tokio::test]
    async fn model_failure_degrades_to_no_change() {
        let session_id = SessionId::new();
        let prior = previous(
            session_id,
            &[("web application", RequirementCategory::ApplicationType)],
        );

        let outcome = RequirementExtractor::new(ScriptedModel::failing())
            .extract_and_merge("anything", &[], session_id, MessageId::new(), &prior)
            .await;

        assert!(outcome.appended.is_empty());
        assert_eq!(outcome.merged, prior);
    }

    #[tokio::test]
    async fn unknown_categories_are_dropped() {
        let model = ScriptedModel::returning(
            r#"{"requirements": [
                {"requirement_type": "budget", "requirement_value": "under $100"},
                {"requirement_type": "preference", "requirement_value": "us-east-1"}
            ]}"#,
        );

        let outcome = RequirementExtractor::new(model)
            .extract_and_merge(
                "keep it cheap, in us-east-1",
                &[],
                SessionId::new(),
                MessageId::new(),
                &RequirementSet::new(),
            )
            .await;

        assert_eq!(outcome.appended.len(), 1);
        assert_eq!(outcome.appended[0].value(), "us-east-1");
    }
}
