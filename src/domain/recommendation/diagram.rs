//! Mermaid diagram source generation.
//!
//! Pure text generation from the chosen services: dependency edges
//! where declared, a linear chain when no dependencies exist, and a
//! placeholder node for an empty architecture.

use super::ServiceChoice;

/// Generates Mermaid flowchart source for an architecture.
pub fn flowchart(services: &[ServiceChoice]) -> String {
    if services.is_empty() {
        return "graph TB\n    A[No Services]\n".to_string();
    }

    let mut lines = vec!["graph TB".to_string()];

    for service in services {
        lines.push(format!(
            "    {}[\"{}\\n{}\"]",
            node_id(&service.name),
            service.name,
            service.role
        ));
    }

    let mut edges = Vec::new();
    for service in services {
        for dependency in &service.depends_on {
            if services
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(dependency))
            {
                edges.push(format!(
                    "    {} --> {}",
                    node_id(dependency),
                    node_id(&service.name)
                ));
            }
        }
    }

    // Without declared dependencies, fall back to a linear flow so the
    // diagram still reads top to bottom.
    if edges.is_empty() && services.len() > 1 {
        for pair in services.windows(2) {
            edges.push(format!(
                "    {} --> {}",
                node_id(&pair[0].name),
                node_id(&pair[1].name)
            ));
        }
    }

    lines.extend(edges);
    lines.join("\n") + "\n"
}

/// Mermaid node identifier: alphanumerics kept, everything else
/// folded to underscores.
fn node_id(name: &str) -> String {
    let id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("s_{}", id)
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::ServiceCategory;

    #[test]
    fn empty_architecture_renders_placeholder() {
        assert_eq!(flowchart(&[]), "graph TB\n    A[No Services]\n");
    }

    #[test]
    fn declared_dependencies_become_edges() {
        let services = vec![
            ServiceChoice::new("ELB", ServiceCategory::Networking, "load balancer"),
            ServiceChoice::new("EC2", ServiceCategory::Compute, "web server")
                .with_dependencies(vec!["ELB".to_string()]),
        ];
        let source = flowchart(&services);
        assert!(source.contains("ELB --> EC2"));
        assert!(source.contains("EC2[\"EC2\\nweb server\"]"));
    }

    #[test]
    fn dependency_on_absent_service_is_skipped() {
        let services = vec![ServiceChoice::new("EC2", ServiceCategory::Compute, "web")
            .with_dependencies(vec!["VPC".to_string()])];
        let source = flowchart(&services);
        assert!(!source.contains("-->"));
    }

    #[test]
    fn no_dependencies_falls_back_to_linear_chain() {
        let services = vec![
            ServiceChoice::new("CloudFront", ServiceCategory::Networking, "cdn"),
            ServiceChoice::new("S3", ServiceCategory::Storage, "assets"),
            ServiceChoice::new("RDS", ServiceCategory::Database, "db"),
        ];
        let source = flowchart(&services);
        assert!(source.contains("CloudFront --> S3"));
        assert!(source.contains("S3 --> RDS"));
    }

    #[test]
    fn node_ids_are_sanitized() {
        let services = vec![
            ServiceChoice::new("Route 53", ServiceCategory::Networking, "dns"),
            ServiceChoice::new("API Gateway", ServiceCategory::Networking, "api"),
        ];
        let source = flowchart(&services);
        assert!(source.contains("Route_53[\"Route 53\\ndns\"]"));
        assert!(source.contains("API_Gateway"));
    }
}
