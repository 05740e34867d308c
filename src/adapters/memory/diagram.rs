//! In-memory diagram renderer and store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::RecommendationId;
use crate::ports::{DiagramError, DiagramFormat, DiagramRenderer, DiagramStore};

/// Pass-through renderer: the "artifact" is the source bytes.
#[derive(Default)]
pub struct PassthroughDiagramRenderer;

impl PassthroughDiagramRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiagramRenderer for PassthroughDiagramRenderer {
    async fn render(&self, source: &str, _format: DiagramFormat) -> Result<Vec<u8>, DiagramError> {
        Ok(source.as_bytes().to_vec())
    }
}

/// HashMap-backed artifact store returning `/diagrams/{id}.{ext}` URLs.
#[derive(Default)]
pub struct InMemoryDiagramStore {
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryDiagramStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }
}

#[async_trait]
impl DiagramStore for InMemoryDiagramStore {
    async fn store(
        &self,
        artifact: &[u8],
        recommendation_id: &RecommendationId,
        format: DiagramFormat,
    ) -> Result<String, DiagramError> {
        let url = format!("/diagrams/{}.{}", recommendation_id, format.extension());
        self.artifacts
            .write()
            .await
            .insert(url.clone(), artifact.to_vec());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_artifact_under_predictable_url() {
        let store = InMemoryDiagramStore::new();
        let id = RecommendationId::new();

        let url = store.store(b"svg bytes", &id, DiagramFormat::Svg).await.unwrap();
        assert_eq!(url, format!("/diagrams/{}.svg", id));
        assert_eq!(store.len().await, 1);
    }
}
