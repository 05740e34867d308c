//! Intent domain: categories, priorities, and the processing status machine.

mod intent;
pub mod schedule;

pub use intent::{Intent, IntentCategory, IntentStatus, IntentTransitionError};
