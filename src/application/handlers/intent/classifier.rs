//! Multi-intent classification.
//!
//! Delegates categorization to the language model and owns everything
//! the model cannot be trusted with: the fixed category → priority
//! mapping, confidence defaults, initial status, and the final
//! ascending priority order.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::conversation::Message;
use crate::domain::foundation::MessageId;
use crate::domain::intent::{schedule, Intent, IntentCategory};
use crate::ports::{CompletionRequest, LanguageModel, LanguageModelError};

/// How many recent turns feed the classification prompt.
const CONTEXT_TURNS: usize = 5;

/// Intent pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("intent classification failed: {0}")]
    Classification(#[from] LanguageModelError),

    #[error("classification payload invalid: {0}")]
    InvalidPayload(String),
}

/// Typed intermediate schema for the model's classification output.
///
/// Validated at the boundary; loosely-typed maps never travel deeper
/// into the pipeline.
#[derive(Debug, Deserialize)]
struct ClassificationPayload {
    #[serde(default)]
    intents: Vec<ClassifiedIntent>,
}

#[derive(Debug, Deserialize)]
struct ClassifiedIntent {
    #[serde(alias = "category")]
    intent_type: String,
    confidence: Option<f64>,
    #[serde(default, alias = "entities")]
    extracted_entities: BTreeMap<String, serde_json::Value>,
}

/// Classifies every intent present in one utterance.
pub struct IntentClassifier {
    model: Arc<dyn LanguageModel>,
    fallback_confidence: f64,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            fallback_confidence: 0.8,
        }
    }

    /// Overrides the confidence assumed when the model omits one.
    pub fn with_fallback_confidence(mut self, confidence: f64) -> Self {
        self.fallback_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Classifies the utterance into zero or more pending intents,
    /// sorted ascending by priority (stable for ties).
    pub async fn classify(
        &self,
        utterance: &str,
        message_id: MessageId,
        recent_context: &[Message],
    ) -> Result<Vec<Intent>, IntentError> {
        let request = CompletionRequest::new(
            "You are an intent recognition expert for a cloud architecture \
             advisor. Respond with a single JSON object only.",
            build_prompt(utterance, recent_context),
        );

        let value = self.model.complete_json(request).await?;
        let payload: ClassificationPayload = serde_json::from_value(value)
            .map_err(|e| IntentError::InvalidPayload(e.to_string()))?;

        let mut intents = Vec::new();
        for classified in payload.intents {
            let Some(category) = IntentCategory::parse(&classified.intent_type) else {
                tracing::warn!(
                    intent_type = %classified.intent_type,
                    "skipping intent with unknown category"
                );
                continue;
            };
            let confidence = classified.confidence.unwrap_or(self.fallback_confidence);
            intents.push(Intent::new(
                message_id,
                category,
                confidence,
                classified.extracted_entities,
            ));
        }

        schedule::sort_by_priority(&mut intents);
        Ok(intents)
    }
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
        "\n\nIdentify every intent present. Intent types:\n\
         1. architecture_request: asking for an architecture recommendation\n\
         2. modification: changing an existing architecture or configuration\n\
         3. pricing_query: asking about cost or price\n\
         4. clarification: asking for explanation or more information\n\n\
         A message may contain several intents. Return JSON of the form:\n\
         {\"intents\": [{\"intent_type\": \"architecture_request\", \
         \"confidence\": 0.9, \"extracted_entities\": {}}]}",
    );
    prompt
}
