//! Session use-cases: creation and lifecycle decisions.

mod create_session;
mod lifecycle;

pub use create_session::CreateSessionHandler;
pub use lifecycle::SessionLifecycle;
