//! Filesystem diagram store.
//!
//! Writes artifacts under a base directory and returns relative URLs
//! of the form `/diagrams/{recommendation_id}.{ext}`, served as
//! static files by the transport layer.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::foundation::RecommendationId;
use crate::ports::{DiagramError, DiagramFormat, DiagramStore};

/// Filesystem [`DiagramStore`].
#[derive(Debug, Clone)]
pub struct FsDiagramStore {
    base_dir: PathBuf,
}

impl FsDiagramStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl DiagramStore for FsDiagramStore {
    async fn store(
        &self,
        artifact: &[u8],
        recommendation_id: &RecommendationId,
        format: DiagramFormat,
    ) -> Result<String, DiagramError> {
        let file_name = format!("{}.{}", recommendation_id, format.extension());
        let path = self.base_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DiagramError::Store(format!("create dir: {}", e)))?;
        tokio::fs::write(&path, artifact)
            .await
            .map_err(|e| DiagramError::Store(format!("write artifact: {}", e)))?;

        Ok(format!("/diagrams/{}", file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_artifact_and_returns_relative_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDiagramStore::new(dir.path());
        let id = RecommendationId::new();

        let url = store
            .store(b"<svg/>", &id, DiagramFormat::Svg)
            .await
            .unwrap();
        assert_eq!(url, format!("/diagrams/{}.svg", id));

        let written = tokio::fs::read(dir.path().join(format!("{}.svg", id)))
            .await
            .unwrap();
        assert_eq!(written, b"<svg/>");
    }

    #[tokio::test]
    async fn creates_missing_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("artifacts").join("diagrams");
        let store = FsDiagramStore::new(&nested);

        store
            .store(b"png", &RecommendationId::new(), DiagramFormat::Png)
            .await
            .unwrap();
        assert!(nested.exists());
    }
}
