//! Scripted language model for tests and offline development.
//!
//! Routes on the calling component's system instructions and replays
//! canned JSON, so whole conversation turns can run without a
//! provider.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{CompletionRequest, LanguageModel, LanguageModelError};

/// Marker in the classifier's system instructions.
const CLASSIFY_MARKER: &str = "intent recognition";
/// Marker in the extractor's system instructions.
const EXTRACT_MARKER: &str = "extracting structured requirements";
/// Marker in the recommendation engine's system instructions.
const RECOMMEND_MARKER: &str = "solutions architect";

/// Canned-response [`LanguageModel`].
#[derive(Default)]
pub struct ScriptedLanguageModel {
    classification: RwLock<Option<String>>,
    extraction: RwLock<Option<String>>,
    proposal: RwLock<Option<String>>,
    fail_all: RwLock<bool>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl ScriptedLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canned classification response.
    pub async fn script_classification(&self, json: &str) {
        *self.classification.write().await = Some(json.to_string());
    }

    /// Sets the canned extraction response.
    pub async fn script_extraction(&self, json: &str) {
        *self.extraction.write().await = Some(json.to_string());
    }

    /// Sets the canned recommendation proposal.
    pub async fn script_proposal(&self, json: &str) {
        *self.proposal.write().await = Some(json.to_string());
    }

    /// Makes every call fail with an unavailability error.
    pub async fn fail_all(&self) {
        *self.fail_all.write().await = true;
    }

    /// User payloads seen so far (test helper).
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        self.calls.write().await.push(request.user.clone());

        if *self.fail_all.read().await {
            return Err(LanguageModelError::Unavailable("scripted failure".into()));
        }

        let scripted = if request.system.contains(CLASSIFY_MARKER) {
            self.classification.read().await.clone()
        } else if request.system.contains(EXTRACT_MARKER) {
            self.extraction.read().await.clone()
        } else if request.system.contains(RECOMMEND_MARKER) {
            self.proposal.read().await.clone()
        } else {
            None
        };

        scripted.ok_or_else(|| {
            LanguageModelError::Unavailable("no scripted response for request".into())
        })
    }
}
