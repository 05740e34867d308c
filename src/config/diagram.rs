//! Diagram pipeline configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Diagram rendering and storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramConfig {
    /// Kroki-compatible renderer base URL.
    #[serde(default = "default_renderer_url")]
    pub renderer_url: String,
    /// Directory rendered artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_renderer_url() -> String {
    "https://kroki.io".to_string()
}

fn default_output_dir() -> String {
    "./data/diagrams".to_string()
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            renderer_url: default_renderer_url(),
            output_dir: default_output_dir(),
        }
    }
}

impl DiagramConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.renderer_url.starts_with("http://") && !self.renderer_url.starts_with("https://")
        {
            return Err(ValidationError::invalid(
                "diagram.renderer_url",
                "must be an http(s) URL",
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ValidationError::invalid(
                "diagram.output_dir",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
