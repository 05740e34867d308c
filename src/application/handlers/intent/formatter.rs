//! Markdown rendering of aggregated turn results.

use crate::domain::recommendation::Recommendation;

use super::aggregator::AggregatedReply;

/// Canonical reply when a turn produced nothing renderable.
pub const FALLBACK_REPLY: &str =
    "I could not produce an architecture recommendation yet. \
     Please share more detail about what you want to build.";

/// Renders aggregated results into the user-facing reply text.
#[derive(Debug, Clone, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the multi-intent reply: architecture section, then
    /// pricing, then clarification. Emits the canonical fallback when
    /// nothing contributed content.
    pub fn format_reply(&self, reply: &AggregatedReply) -> String {
        let mut sections = Vec::new();

        for recommendation in &reply.recommendations {
            sections.push(self.architecture_section(recommendation));
        }

        if let Some(estimate) = &reply.pricing {
            let mut section = String::from("## Pricing\n");
            section.push_str(&format!(
                "**Estimated monthly cost**: ${:.2}\n",
                estimate.total_monthly()
            ));
            if !estimate.breakdown().is_empty() {
                section.push_str("\n**Breakdown:**\n");
                for item in estimate.breakdown() {
                    section.push_str(&format!(
                        "- {}: ${:.2}\n",
                        item.service_name, item.monthly_cost
                    ));
                }
            }
            sections.push(section);
        }

        if !reply.content_parts.is_empty() {
            let mut section = String::from("## Clarification\n");
            section.push_str(&reply.content_parts.join("\n\n"));
            section.push('\n');
            sections.push(section);
        }

        if sections.is_empty() {
            return FALLBACK_REPLY.to_string();
        }
        sections.join("\n")
    }

    /// Fallback path for turns that classified no intents but still
    /// produced a recommendation.
    pub fn format_single_recommendation(&self, recommendation: &Recommendation) -> String {
        self.architecture_section(recommendation)
    }

    fn architecture_section(&self, recommendation: &Recommendation) -> String {
        let mut section = String::from("## Architecture Recommendation\n");
        section.push_str(recommendation.explanation());
        section.push_str("\n\n**Recommended services:**\n");
        for service in recommendation.services() {
            section.push_str(&format!("- **{}**: {}\n", service.name, service.role));
        }
        if let Some(url) = recommendation.diagram_url() {
            section.push_str(&format!("\n**Architecture diagram:** {}\n", url));
        }
        section
    }
}
