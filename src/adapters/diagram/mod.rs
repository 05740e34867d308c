//! Diagram adapters.

mod fs_store;
mod http_renderer;

pub use fs_store::FsDiagramStore;
pub use http_renderer::{HttpDiagramRenderer, HttpDiagramRendererConfig};
