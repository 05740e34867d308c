//! Diagram rendering and storage.
//!
//! Renders a recommendation's Mermaid source through the renderer
//! port and stores the artifact, attaching the resulting URL to the
//! recommendation. Any failure degrades to a recommendation without
//! a diagram URL.

use std::sync::Arc;

use crate::domain::recommendation::Recommendation;
use crate::ports::{DiagramFormat, DiagramRenderer, DiagramStore};

/// Renders and stores diagrams for recommendations.
pub struct DiagramService {
    renderer: Arc<dyn DiagramRenderer>,
    store: Arc<dyn DiagramStore>,
    format: DiagramFormat,
}

impl DiagramService {
    pub fn new(renderer: Arc<dyn DiagramRenderer>, store: Arc<dyn DiagramStore>) -> Self {
        Self {
            renderer,
            store,
            format: DiagramFormat::Svg,
        }
    }

    pub fn with_format(mut self, format: DiagramFormat) -> Self {
        self.format = format;
        self
    }

    /// Renders and stores the diagram, attaching the URL on success.
    ///
    /// Returns the URL when one was attached.
    pub async fn attach(&self, recommendation: &mut Recommendation) -> Option<String> {
        let artifact = match self
            .renderer
            .render(recommendation.diagram_source(), self.format)
            .await
        {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::warn!(
                    recommendation_id = %recommendation.id(),
                    error = %err,
                    "diagram render failed, continuing without diagram"
                );
                return None;
            }
        };

        match self
            .store
            .store(&artifact, recommendation.id(), self.format)
            .await
        {
            Ok(url) => {
                recommendation.attach_diagram_url(url.clone());
                Some(url)
            }
            Err(err) => {
                tracing::warn!(
                    recommendation_id = %recommendation.id(),
                    error = %err,
                    "diagram store failed, continuing without diagram"
                );
                None
            }
        }
    }
}
