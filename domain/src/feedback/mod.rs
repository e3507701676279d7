//! User feedback signal and the summary built from it.
//!
//! Three independent sources feed refinement: names the user liked, names
//! the user disliked, and names that turned out to be taken. An optional
//! free-text critique covers "none of these worked" without naming any.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feedback collected at the end of a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSignal {
    /// name → why the user liked it
    #[serde(default)]
    pub liked: BTreeMap<String, String>,
    /// name → why the user disliked it
    #[serde(default)]
    pub disliked: BTreeMap<String, String>,
    /// Names from the round that were unavailable
    #[serde(default)]
    pub taken: Vec<String>,
    /// Reason the whole batch missed, if given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critique: Option<String>,
}

impl FeedbackSignal {
    pub fn new(
        liked: BTreeMap<String, String>,
        disliked: BTreeMap<String, String>,
        taken: Vec<String>,
    ) -> Self {
        Self {
            liked,
            disliked,
            taken,
            critique: None,
        }
    }

    pub fn with_critique(mut self, critique: impl Into<String>) -> Self {
        let critique = critique.into();
        self.critique = if critique.trim().is_empty() {
            None
        } else {
            Some(critique)
        };
        self
    }

    /// No signal at all: refinement must be a no-op
    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
            && self.disliked.is_empty()
            && self.taken.is_empty()
            && self.critique.is_none()
    }

    /// Render the structured summary handed to the rewrite step.
    ///
    /// Returns an empty string when there is no signal.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.liked.is_empty() {
            let lines: Vec<String> = self
                .liked
                .iter()
                .map(|(name, reason)| format!("- Liked '{}': {}", name, reason))
                .collect();
            parts.push(format!(
                "POSITIVE FEEDBACK (domains the user liked):\n{}",
                lines.join("\n")
            ));
        }

        if !self.disliked.is_empty() {
            let lines: Vec<String> = self
                .disliked
                .iter()
                .map(|(name, reason)| format!("- Disliked '{}': {}", name, reason))
                .collect();
            parts.push(format!(
                "NEGATIVE FEEDBACK (domains the user disliked):\n{}",
                lines.join("\n")
            ));
        }

        if !self.taken.is_empty() {
            parts.push(format!(
                "NEGATIVE FEEDBACK (these were good ideas, but already taken):\n- {}",
                self.taken.join(", ")
            ));
        }

        if let Some(critique) = &self.critique {
            parts.push(format!(
                "CRITICAL FEEDBACK (why the user disliked all previous suggestions):\n- {}",
                critique
            ));
        }

        parts.join("\n\n")
    }
}

/// Critique used to push the brief after a round found nothing available
pub fn empty_round_critique(taken: &[String]) -> String {
    if taken.is_empty() {
        "No available domains were found, and the generator returned few ideas.".to_string()
    } else {
        format!(
            "No available domains were found. The following ideas were all taken: {}",
            taken.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_signal_has_empty_summary() {
        let signal = FeedbackSignal::default();
        assert!(signal.is_empty());
        assert_eq!(signal.summary(), "");
    }

    #[test]
    fn test_summary_sections() {
        let mut liked = BTreeMap::new();
        liked.insert("leafly.io".to_string(), "short".to_string());
        let signal = FeedbackSignal::new(liked, BTreeMap::new(), vec!["leaf.com".to_string()]);

        let summary = signal.summary();
        assert!(summary.contains("POSITIVE FEEDBACK"));
        assert!(summary.contains("- Liked 'leafly.io': short"));
        assert!(summary.contains("already taken):\n- leaf.com"));
        assert!(!summary.contains("CRITICAL"));
    }

    #[test]
    fn test_blank_critique_is_ignored() {
        let signal = FeedbackSignal::default().with_critique("   ");
        assert!(signal.is_empty());
    }

    #[test]
    fn test_critique_only_is_a_signal() {
        let signal = FeedbackSignal::default().with_critique("too long");
        assert!(!signal.is_empty());
        assert!(signal.summary().contains("- too long"));
    }

    #[test]
    fn test_empty_round_critique() {
        assert!(empty_round_critique(&[]).contains("few ideas"));
        let text = empty_round_critique(&["a.com".to_string(), "b.com".to_string()]);
        assert!(text.ends_with("a.com, b.com"));
    }
}
