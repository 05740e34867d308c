//! Conversation domain: messages, working context, and summarization.

mod context;
mod message;
pub mod summary;

pub use context::{Context, ContextUpdate};
pub use message::{Message, MessageRole};
pub use summary::{summarize, SummaryPolicy};
