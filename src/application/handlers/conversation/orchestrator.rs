//! Conversation orchestration.
//!
//! One turn runs a fixed pipeline over a shared [`TurnState`]:
//! classify intents → extract and merge requirements → generate a
//! recommendation → attach diagram and pricing artifacts → process
//! intents, aggregate, and format → persist the context update.
//! Branching happens only inside the intent fan-out; the stages
//! themselves always run in this order.
//!
//! Stage-local failures degrade (zero intents, no extraction, no
//! recommendation, no artifacts); only storage write failures abort
//! the turn. A turn with nothing to say still returns the canonical
//! fallback reply.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::conversation::ContextManager;
use crate::application::handlers::diagram::DiagramService;
use crate::application::handlers::intent::{
    IntentClassifier, IntentOutcome, IntentScheduler, ResponseFormatter, ResultAggregator,
    TurnSnapshot, FALLBACK_REPLY,
};
use crate::application::handlers::pricing::CostEstimator;
use crate::application::handlers::recommendation::{RecommendationEngine, RecommendationError};
use crate::application::handlers::requirement::RequirementExtractor;
use crate::domain::conversation::{ContextUpdate, Message};
use crate::domain::foundation::{DomainError, IntentId, MessageId, SessionId};
use crate::domain::intent::{schedule, Intent};
use crate::domain::pricing::CostEstimate;
use crate::domain::recommendation::Recommendation;
use crate::domain::requirement::{Requirement, RequirementSet};
use crate::ports::{MessageStore, RequirementStore};

/// Messages loaded as turn history.
const HISTORY_LIMIT: usize = 50;

/// A turn that could not complete.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("storage failure: {0}")]
    Storage(#[from] DomainError),
}

/// The turn-scoped mutable state every stage receives and returns.
#[derive(Debug, Default)]
pub struct TurnState {
    pub utterance: String,
    pub history: Vec<Message>,
    pub requirements: RequirementSet,
    pub appended: Vec<Requirement>,
    pub intents: Vec<Intent>,
    pub recommendation: Option<Recommendation>,
    pub estimate: Option<CostEstimate>,
    pub diagram_url: Option<String>,
    pub outcomes: HashMap<IntentId, IntentOutcome>,
}

/// The reply produced by one turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub content: String,
    pub intents: Vec<Intent>,
    pub recommendations: Vec<Recommendation>,
    pub pricing: Option<CostEstimate>,
    pub diagrams: Vec<String>,
    pub metadata: serde_json::Value,
}

/// Wires the per-message pipeline together.
pub struct ConversationOrchestrator {
    classifier: Arc<IntentClassifier>,
    extractor: Arc<RequirementExtractor>,
    engine: Arc<RecommendationEngine>,
    estimator: Arc<CostEstimator>,
    diagrams: Arc<DiagramService>,
    scheduler: IntentScheduler,
    aggregator: ResultAggregator,
    formatter: ResponseFormatter,
    context: Arc<ContextManager>,
    messages: Arc<dyn MessageStore>,
    requirements: Arc<dyn RequirementStore>,
}

impl ConversationOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        classifier: Arc<IntentClassifier>,
        extractor: Arc<RequirementExtractor>,
        engine: Arc<RecommendationEngine>,
        estimator: Arc<CostEstimator>,
        diagrams: Arc<DiagramService>,
        context: Arc<ContextManager>,
        messages: Arc<dyn MessageStore>,
        requirements: Arc<dyn RequirementStore>,
    ) -> Self {
        Self {
            classifier,
            extractor,
            engine,
            estimator,
            diagrams,
            scheduler: IntentScheduler::new(),
            aggregator: ResultAggregator::new(),
            formatter: ResponseFormatter::new(),
            context,
            messages,
            requirements,
        }
    }

    /// Processes one user message end to end.
    #[tracing::instrument(skip(self, utterance), fields(session_id = %session_id))]
    pub async fn process_message(
        &self,
        session_id: SessionId,
        message_id: MessageId,
        utterance: &str,
    ) -> Result<TurnReply, TurnError> {
        let mut state = TurnState {
            utterance: utterance.to_string(),
            ..TurnState::default()
        };

        self.prepare(session_id, &mut state).await;
        self.classify(message_id, &mut state).await;
        self.extract(session_id, message_id, &mut state).await?;
        self.recommend(session_id, &mut state).await;
        self.attach_artifacts(&mut state).await;
        let reply = self.respond(&mut state);
        self.persist(session_id, &state).await?;

        Ok(reply)
    }

    /// Loads prior context and history. Read failures degrade to an
    /// empty starting point.
    async fn prepare(&self, session_id: SessionId, state: &mut TurnState) {
        match self.context.retrieve(&session_id).await {
            Ok(Some(context)) => {
                state.requirements = context.requirements().clone();
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "context retrieval failed, starting empty");
            }
        }

        match self
            .messages
            .get_by_session(&session_id, HISTORY_LIMIT, false)
            .await
        {
            Ok(history) => state.history = history,
            Err(err) => {
                tracing::warn!(error = %err, "history load failed, continuing without context");
            }
        }
    }

    /// Classification failure is treated as zero intents recognized.
    async fn classify(&self, message_id: MessageId, state: &mut TurnState) {
        match self
            .classifier
            .classify(&state.utterance, message_id, &state.history)
            .await
        {
            Ok(intents) => {
                tracing::debug!(count = intents.len(), "intents classified");
                state.intents = intents;
            }
            Err(err) => {
                tracing::warn!(error = %err, "intent classification failed, assuming no intents");
                state.intents = Vec::new();
            }
        }
    }

    /// Extraction degrades internally; persisting the appended
    /// requirements is a write and therefore turn-fatal on failure.
    async fn extract(
        &self,
        session_id: SessionId,
        message_id: MessageId,
        state: &mut TurnState,
    ) -> Result<(), TurnError> {
        let outcome = self
            .extractor
            .extract_and_merge(
                &state.utterance,
                &state.history,
                session_id,
                message_id,
                &state.requirements,
            )
            .await;

        state.requirements = outcome.merged;
        state.appended = outcome.appended;

        for requirement in &state.appended {
            self.requirements.create(requirement).await?;
        }

        if !state.appended.is_empty() {
            self.context
                .update(
                    &session_id,
                    ContextUpdate::new().with_requirements(state.appended.clone()),
                )
                .await?;
        }
        Ok(())
    }

    /// A turn with no requirements, or a failed generation, simply
    /// yields no recommendation.
    async fn recommend(&self, session_id: SessionId, state: &mut TurnState) {
        if state.requirements.is_empty() {
            return;
        }

        match self
            .engine
            .recommend(&state.requirements, session_id, &state.history)
            .await
        {
            Ok(recommendation) => state.recommendation = Some(recommendation),
            Err(RecommendationError::NoRequirements) => {}
            Err(err) => {
                tracing::warn!(error = %err, "recommendation generation failed, continuing without");
            }
        }
    }

    /// Diagram always; pricing only when a pricing intent asked for it.
    async fn attach_artifacts(&self, state: &mut TurnState) {
        let Some(recommendation) = state.recommendation.as_mut() else {
            return;
        };

        state.diagram_url = self.diagrams.attach(recommendation).await;

        if schedule::has_pricing_query(&state.intents) {
            let assumptions = json!({ "hours_per_month": crate::domain::pricing::HOURS_PER_MONTH });
            if let Some(estimate) = self.estimator.estimate(recommendation, assumptions).await {
                recommendation.attach_estimate(*estimate.id());
                state.estimate = Some(estimate);
            }
        }
    }

    /// Intent fan-out, aggregation, and formatting.
    fn respond(&self, state: &mut TurnState) -> TurnReply {
        if state.intents.is_empty() {
            // No-multi-intent fallback path: render the raw
            // recommendation when one exists.
            return match &state.recommendation {
                Some(recommendation) => TurnReply {
                    content: self.formatter.format_single_recommendation(recommendation),
                    intents: Vec::new(),
                    recommendations: vec![recommendation.clone()],
                    pricing: None,
                    diagrams: state.diagram_url.iter().cloned().collect(),
                    metadata: self.reply_metadata(state, json!({})),
                },
                None => TurnReply {
                    content: FALLBACK_REPLY.to_string(),
                    intents: Vec::new(),
                    recommendations: Vec::new(),
                    pricing: None,
                    diagrams: Vec::new(),
                    metadata: json!({}),
                },
            };
        }

        let snapshot = TurnSnapshot {
            recommendation: state.recommendation.clone(),
            estimate: state.estimate.clone(),
            diagram_url: state.diagram_url.clone(),
            missing_categories: state.requirements.missing_categories(),
        };
        state.outcomes = self.scheduler.process(&mut state.intents, &snapshot);

        let aggregated = self.aggregator.aggregate(&state.outcomes, &state.intents);
        let content = self.formatter.format_reply(&aggregated);
        let metadata = self.reply_metadata(state, aggregated.metadata.clone());

        TurnReply {
            content,
            intents: state.intents.clone(),
            recommendations: aggregated.recommendations,
            pricing: aggregated.pricing,
            diagrams: aggregated.diagrams,
            metadata,
        }
    }

    fn reply_metadata(&self, state: &TurnState, base: serde_json::Value) -> serde_json::Value {
        let mut metadata = match base {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        if let Some(recommendation) = &state.recommendation {
            metadata.insert(
                "recommendation_id".to_string(),
                json!(recommendation.id().to_string()),
            );
        }
        if let Some(url) = &state.diagram_url {
            metadata.insert("diagram_url".to_string(), json!(url));
        }
        serde_json::Value::Object(metadata)
    }

    /// Writes the turn's context delta; failure here fails the turn.
    async fn persist(&self, session_id: SessionId, state: &TurnState) -> Result<(), TurnError> {
        let mut update = ContextUpdate::new();
        if !state.intents.is_empty() {
            update = update.with_intents(state.intents.clone());
        }
        if let Some(recommendation) = &state.recommendation {
            update = update.with_recommendation(*recommendation.id());
        }
        self.context.update(&session_id, update).await?;
        Ok(())
    }
}
