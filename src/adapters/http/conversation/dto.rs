//! Request and response DTOs for conversation endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::conversation::TurnReply;
use crate::domain::conversation::Message;
use crate::domain::intent::Intent;
use crate::domain::pricing::CostEstimate;
use crate::domain::recommendation::Recommendation;
use crate::domain::session::Session;

/// Maximum accepted message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// POST /conversations response.
#[derive(Debug, Serialize)]
pub struct CreateConversationResponse {
    pub session_id: String,
    pub created_at: String,
    pub expires_at: String,
}

impl From<&Session> for CreateConversationResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at().to_string(),
            expires_at: session.expires_at().to_string(),
        }
    }
}

/// GET /conversations/:id response.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub session_id: String,
    pub created_at: String,
    pub last_accessed_at: String,
    pub expires_at: String,
}

impl From<&Session> for ConversationResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at().to_string(),
            last_accessed_at: session.last_accessed_at().to_string(),
            expires_at: session.expires_at().to_string(),
        }
    }
}

/// POST /conversations/:id/messages request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

impl SendMessageRequest {
    /// Validates and normalizes the content: non-empty after
    /// trimming, bounded length, no NUL bytes.
    pub fn validated_content(&self) -> Result<String, String> {
        let content = self.content.replace('\0', "");
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err("Message content must not be empty".to_string());
        }
        if trimmed.chars().count() > MAX_MESSAGE_CHARS {
            return Err(format!(
                "Message content exceeds {} characters",
                MAX_MESSAGE_CHARS
            ));
        }
        Ok(trimmed.to_string())
    }
}

/// One classified intent, as exposed over the wire.
#[derive(Debug, Serialize)]
pub struct IntentDto {
    pub intent_id: String,
    pub category: String,
    pub priority: u8,
    pub confidence: f64,
    pub status: String,
}

impl From<&Intent> for IntentDto {
    fn from(intent: &Intent) -> Self {
        Self {
            intent_id: intent.id().to_string(),
            category: intent.category().as_str().to_string(),
            priority: intent.priority(),
            confidence: intent.confidence(),
            status: intent.status().as_str().to_string(),
        }
    }
}

/// One recommended service, as exposed over the wire.
#[derive(Debug, Serialize)]
pub struct ServiceDto {
    pub name: String,
    pub category: String,
    pub role: String,
}

/// One recommendation, as exposed over the wire.
#[derive(Debug, Serialize)]
pub struct RecommendationDto {
    pub recommendation_id: String,
    pub services: Vec<ServiceDto>,
    pub explanation: String,
    pub diagram_url: Option<String>,
}

impl From<&Recommendation> for RecommendationDto {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            recommendation_id: recommendation.id().to_string(),
            services: recommendation
                .services()
                .iter()
                .map(|service| ServiceDto {
                    name: service.name.clone(),
                    category: service.category.as_str().to_string(),
                    role: service.role.clone(),
                })
                .collect(),
            explanation: recommendation.explanation().to_string(),
            diagram_url: recommendation.diagram_url().map(str::to_string),
        }
    }
}

/// Pricing summary, as exposed over the wire.
#[derive(Debug, Serialize)]
pub struct PricingDto {
    pub total_monthly_cost: String,
    pub breakdown: Vec<ServiceCostDto>,
}

#[derive(Debug, Serialize)]
pub struct ServiceCostDto {
    pub service_name: String,
    pub monthly_cost: String,
}

impl From<&CostEstimate> for PricingDto {
    fn from(estimate: &CostEstimate) -> Self {
        Self {
            total_monthly_cost: estimate.total_monthly().to_string(),
            breakdown: estimate
                .breakdown()
                .iter()
                .map(|item| ServiceCostDto {
                    service_name: item.service_name.clone(),
                    monthly_cost: item.monthly_cost.to_string(),
                })
                .collect(),
        }
    }
}

/// POST /conversations/:id/messages response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message_id: String,
    pub session_id: String,
    pub content: String,
    pub timestamp: String,
    pub intents: Vec<IntentDto>,
    pub recommendations: Vec<RecommendationDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingDto>,
    pub diagrams: Vec<String>,
}

impl MessageResponse {
    pub fn from_turn(assistant_message: &Message, reply: &TurnReply) -> Self {
        Self {
            message_id: assistant_message.id().to_string(),
            session_id: assistant_message.session_id().to_string(),
            content: reply.content.clone(),
            timestamp: assistant_message.timestamp().to_string(),
            intents: reply.intents.iter().map(IntentDto::from).collect(),
            recommendations: reply
                .recommendations
                .iter()
                .map(RecommendationDto::from)
                .collect(),
            pricing: reply.pricing.as_ref().map(PricingDto::from),
            diagrams: reply.diagrams.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_empty_and_oversized_content() {
        let empty = SendMessageRequest {
            content: "   ".to_string(),
        };
        assert!(empty.validated_content().is_err());

        let oversized = SendMessageRequest {
            content: "x".repeat(MAX_MESSAGE_CHARS + 1),
        };
        assert!(oversized.validated_content().is_err());

        let ok = SendMessageRequest {
            content: "  a shop please  ".to_string(),
        };
        assert_eq!(ok.validated_content().unwrap(), "a shop please");
    }

    #[test]
    fn validation_strips_nul_bytes() {
        let req = SendMessageRequest {
            content: "hel\0lo".to_string(),
        };
        assert_eq!(req.validated_content().unwrap(), "hello");
    }
}
