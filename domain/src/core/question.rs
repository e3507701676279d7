//! Question value object

use serde::{Deserialize, Serialize};

/// A clarifying question issued to the user (Value Object)
///
/// Questions are immutable once issued; the next round supersedes the whole
/// set rather than editing individual entries. A plain-string question is
/// represented with `id == text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: String,
    text: String,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the text is empty or only whitespace
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        assert!(!text.trim().is_empty(), "Question cannot be empty");
        Self {
            id: id.into(),
            text,
        }
    }

    /// Try to create a new question, returning None if the text is blank
    pub fn try_new(id: impl Into<String>, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self {
                id: id.into(),
                text: text.trim().to_string(),
            })
        }
    }

    /// Degenerate form: the text doubles as the identifier
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// Build a numbered set (`q1`, `q2`, ...) from bare texts
    pub fn numbered<I, S>(texts: I) -> Vec<Question>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .filter_map(|t| {
                let t = t.into();
                if t.trim().is_empty() { None } else { Some(t) }
            })
            .enumerate()
            .map(|(i, t)| Question::new(format!("q{}", i + 1), t))
            .collect()
    }

    /// Fallback pair used when the clarifying step fails on the first round
    pub fn initial_fallback() -> Vec<Question> {
        Self::numbered(["Primary purpose?", "Target audience?"])
    }

    /// Fallback pair used when the refinement step fails on later rounds
    pub fn refinement_fallback() -> Vec<Question> {
        Self::numbered([
            "What specific element did you like most?",
            "What was missing?",
        ])
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
