//! Session lifecycle domain.

mod aggregate;

pub use aggregate::{Session, SESSION_TTL_DAYS};
