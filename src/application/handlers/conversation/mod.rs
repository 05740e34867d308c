//! Conversation use-cases: context management and turn orchestration.

mod context_manager;
mod orchestrator;

pub use context_manager::ContextManager;
pub use orchestrator::{ConversationOrchestrator, TurnError, TurnReply, TurnState};
