//! In-memory adapters for tests and development.

mod diagram;
mod language_model;
mod message_store;
mod pricing;
mod requirement_store;
mod session_store;

pub use diagram::{InMemoryDiagramStore, PassthroughDiagramRenderer};
pub use language_model::ScriptedLanguageModel;
pub use message_store::InMemoryMessageStore;
pub use pricing::{InMemoryPriceCache, StaticPriceSource};
pub use requirement_store::InMemoryRequirementStore;
pub use session_store::InMemorySessionStore;
