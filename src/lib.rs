//! Archway - conversational cloud-architecture advisor.
//!
//! Turns natural-language architecture requests into structured
//! recommendations, diagrams, and cost estimates across a multi-turn
//! session, orchestrated by a multi-intent conversation core.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
