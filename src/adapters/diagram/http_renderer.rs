//! HTTP diagram renderer.
//!
//! Posts Mermaid source to a Kroki-compatible rendering service:
//! `POST {base}/mermaid/{format}` with the source as the body, the
//! rendered artifact bytes as the response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::ports::{DiagramError, DiagramFormat, DiagramRenderer};

/// Configuration for the HTTP renderer.
#[derive(Debug, Clone)]
pub struct HttpDiagramRendererConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpDiagramRendererConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP [`DiagramRenderer`].
pub struct HttpDiagramRenderer {
    config: HttpDiagramRendererConfig,
    client: Client,
}

impl HttpDiagramRenderer {
    pub fn new(config: HttpDiagramRendererConfig) -> Result<Self, DiagramError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DiagramError::Render(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl DiagramRenderer for HttpDiagramRenderer {
    async fn render(&self, source: &str, format: DiagramFormat) -> Result<Vec<u8>, DiagramError> {
        let url = format!("{}/mermaid/{}", self.config.base_url, format.extension());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "text/plain")
            .body(source.to_string())
            .send()
            .await
            .map_err(|e| DiagramError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DiagramError::Render(format!(
                "renderer returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DiagramError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
