//! HTTP adapters - REST surface over the conversation core.

pub mod conversation;
pub mod error;
pub mod health;
pub mod rate_limit;
pub mod turn_locks;

pub use conversation::{conversation_router, ConversationHandlers};
pub use error::ErrorResponse;
pub use health::health_router;
pub use rate_limit::FixedWindowLimiter;
pub use turn_locks::TurnLocks;
