//! Use-case handlers. Each holds its port dependencies behind
//! `Arc<dyn Trait>` and is constructed in `main.rs`.

pub mod conversation;
pub mod diagram;
pub mod intent;
pub mod pricing;
pub mod recommendation;
pub mod requirement;
pub mod session;
