//! Model value object representing a text-generation model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available text-generation models (Value Object)
///
/// Each agent role (question asker, creator, checker, ...) is bound to one
/// of these. Anything not listed parses as [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // OpenAI models
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    Gpt41Mini,
    O4Mini,
    // Gemini models
    Gemini15Flash,
    Gemini25Flash,
    Gemini25Pro,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::O4Mini => "o4-mini",
            Model::Gemini15Flash => "gemini-1.5-flash-latest",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is an OpenAI model (GPT or o-series)
    pub fn is_openai(&self) -> bool {
        match self {
            Model::Gpt4o | Model::Gpt4oMini | Model::Gpt41 | Model::Gpt41Mini | Model::O4Mini => {
                true
            }
            Model::Custom(s) => s.starts_with("gpt-") || s.starts_with("o3") || s.starts_with("o4"),
            _ => false,
        }
    }

    /// Check if this is a Gemini model
    pub fn is_gemini(&self) -> bool {
        match self {
            Model::Gemini15Flash | Model::Gemini25Flash | Model::Gemini25Pro => true,
            Model::Custom(s) => s.starts_with("gemini-"),
            _ => false,
        }
    }

    /// Reasoning models reject a sampling temperature
    pub fn accepts_temperature(&self) -> bool {
        match self {
            Model::O4Mini => false,
            Model::Custom(s) => !(s.starts_with("o3") || s.starts_with("o4")),
            _ => true,
        }
    }
}

impl Default for Model {
    /// Returns the default creator model (GPT-4o)
    fn default() -> Self {
        Model::Gpt4o
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "o4-mini" => Model::O4Mini,
            "gemini-1.5-flash-latest" | "gemini-1.5-flash" => Model::Gemini15Flash,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse();
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in [Model::Gpt4o, Model::O4Mini, Model::Gemini15Flash] {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "my-local-model".parse().unwrap();
        assert_eq!(model, Model::Custom("my-local-model".to_string()));
        assert_eq!(model.to_string(), "my-local-model");
    }

    #[test]
    fn test_model_family_detection() {
        assert!(Model::Gpt4o.is_openai());
        assert!(Model::O4Mini.is_openai());
        assert!(Model::Gemini15Flash.is_gemini());
        assert!(!Model::Gemini15Flash.is_openai());
        assert!(Model::Custom("gemini-3-pro".to_string()).is_gemini());
        assert!(Model::Custom("gpt-5".to_string()).is_openai());
    }

    #[test]
    fn test_reasoning_models_skip_temperature() {
        assert!(!Model::O4Mini.accepts_temperature());
        assert!(Model::Gpt4o.accepts_temperature());
    }
}
