//! Diagram ports: rendering and artifact storage.

use async_trait::async_trait;

use crate::domain::foundation::RecommendationId;

/// Output format for a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    Svg,
    Png,
}

impl DiagramFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DiagramFormat::Svg => "svg",
            DiagramFormat::Png => "png",
        }
    }
}

/// Diagram pipeline errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiagramError {
    #[error("render failed: {0}")]
    Render(String),

    #[error("store failed: {0}")]
    Store(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Renders diagram source text into an artifact.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, source: &str, format: DiagramFormat) -> Result<Vec<u8>, DiagramError>;
}

/// Stores a rendered artifact and returns a retrievable URL.
#[async_trait]
pub trait DiagramStore: Send + Sync {
    async fn store(
        &self,
        artifact: &[u8],
        recommendation_id: &RecommendationId,
        format: DiagramFormat,
    ) -> Result<String, DiagramError>;
}
