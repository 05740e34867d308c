//! Truncate-and-join conversation summarization.
//!
//! Deliberately naive: take the first few messages, clip each, join
//! with a separator, and hard-cap the total. Overflow ends in an
//! ellipsis marker and the result never exceeds the cap.

use super::Message;

/// Marker appended when the summary is clipped at the cap.
pub const ELLIPSIS: &str = "...";

/// Summarization policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct SummaryPolicy {
    /// How many leading messages contribute.
    pub max_messages: usize,
    /// Characters kept from each message.
    pub max_chars_per_message: usize,
    /// Hard cap on the joined summary, ellipsis included.
    pub max_total_chars: usize,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self {
            max_messages: 5,
            max_chars_per_message: 100,
            max_total_chars: 500,
        }
    }
}

/// Summarizes a message history under the given policy.
///
/// Returns an empty string for an empty history. Clipping is
/// character-based, not byte-based, so multi-byte text stays intact.
pub fn summarize(messages: &[Message], policy: &SummaryPolicy) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = messages
        .iter()
        .take(policy.max_messages)
        .map(|msg| clip_chars(msg.content(), policy.max_chars_per_message))
        .collect();

    let summary = parts.join(" | ");
    if summary.chars().count() <= policy.max_total_chars {
        return summary;
    }

    let keep = policy.max_total_chars.saturating_sub(ELLIPSIS.len());
    let mut clipped = clip_chars(&summary, keep);
    clipped.push_str(ELLIPSIS);
    clipped
}

fn clip_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
