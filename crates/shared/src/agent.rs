//! Agent profile types: model tiers, prompt templates, and the per-agent
//! definition the registry hands out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ComposeError;

/// Placeholder substituted in parameterized prompts.
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

/// Logical model grouping, resolved to a backend model through [`ModelCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelTier {
    Standard,
    Reasoning,
    Vision,
    Code,
}

impl ModelTier {
    pub fn all() -> &'static [ModelTier] {
        &[
            ModelTier::Standard,
            ModelTier::Reasoning,
            ModelTier::Vision,
            ModelTier::Code,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Standard => "Standard",
            ModelTier::Reasoning => "Reasoning",
            ModelTier::Vision => "Vision",
            ModelTier::Code => "Code",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelTier::all()
            .iter()
            .copied()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ComposeError::UnknownTier {
                tier: s.to_string(),
            })
    }
}

/// Concrete backend model name for each tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub standard: String,
    pub reasoning: String,
    pub vision: String,
    pub code: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            standard: "Nemotron Ultra 253B".into(),
            reasoning: "Nemotron Ultra 253B (Reasoning)".into(),
            vision: "Gemma3 27B".into(),
            code: "Qwen2.5 Coder 32B".into(),
        }
    }
}

impl ModelCatalog {
    pub fn model_name(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Standard => &self.standard,
            ModelTier::Reasoning => &self.reasoning,
            ModelTier::Vision => &self.vision,
            ModelTier::Code => &self.code,
        }
    }

    /// Resolve a tier given by name, e.g. from a settings file.
    pub fn model_for_tier_name(&self, tier: &str) -> Result<&str, ComposeError> {
        let tier: ModelTier = tier.parse()?;
        Ok(self.model_name(tier))
    }
}

/// What a parameterized prompt asks the user to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubOptionKind {
    /// Target natural language
    Language,
    /// Programming language for generated code
    ProgrammingLanguage,
}

impl SubOptionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SubOptionKind::Language => "Target language",
            SubOptionKind::ProgrammingLanguage => "Programming language",
        }
    }
}

/// System prompt of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    Fixed(&'static str),
    /// Contains [`LANGUAGE_PLACEHOLDER`] exactly where the selection goes.
    Parameterized {
        text: &'static str,
        option: SubOptionKind,
    },
}

impl PromptTemplate {
    pub fn required_option(&self) -> Option<SubOptionKind> {
        match self {
            PromptTemplate::Fixed(_) => None,
            PromptTemplate::Parameterized { option, .. } => Some(*option),
        }
    }

    /// Raw template text, placeholder included.
    pub fn text(&self) -> &'static str {
        match self {
            PromptTemplate::Fixed(text) => text,
            PromptTemplate::Parameterized { text, .. } => text,
        }
    }

    /// Produce the system message. `Fixed` templates ignore `value`.
    pub fn fill(&self, value: &str) -> String {
        match self {
            PromptTemplate::Fixed(text) => (*text).to_string(),
            PromptTemplate::Parameterized { text, .. } => text.replace(LANGUAGE_PLACEHOLDER, value),
        }
    }
}

/// A named, preconfigured task profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
    pub id: &'static str,
    /// Name shown in the agent picker
    pub label: &'static str,
    pub tier: ModelTier,
    pub prompt: PromptTemplate,
    /// Input hint shown while the text box is empty
    pub placeholder: &'static str,
    /// Short example of suitable input
    pub example: &'static str,
    /// Used as the user message when only files were provided
    pub default_file_instruction: &'static str,
    /// Allowed selections for a parameterized prompt, in display order
    pub sub_options: &'static [&'static str],
    pub default_sub_option: Option<&'static str>,
}

impl AgentDefinition {
    pub fn accepts_sub_option(&self, value: &str) -> bool {
        self.sub_options.iter().any(|o| *o == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_is_case_insensitive() {
        assert_eq!("reasoning".parse::<ModelTier>().unwrap(), ModelTier::Reasoning);
        assert_eq!(" Code ".parse::<ModelTier>().unwrap(), ModelTier::Code);
    }

    #[test]
    fn test_unknown_tier_is_rejected() {
        let err = "Turbo".parse::<ModelTier>().unwrap_err();
        assert!(matches!(err, ComposeError::UnknownTier { ref tier } if tier == "Turbo"));

        let catalog = ModelCatalog::default();
        assert!(catalog.model_for_tier_name("Audio").is_err());
    }

    #[test]
    fn test_catalog_maps_every_tier() {
        let catalog = ModelCatalog::default();
        for tier in ModelTier::all() {
            assert!(!catalog.model_name(*tier).is_empty());
        }
        assert_eq!(catalog.model_for_tier_name("vision").unwrap(), "Gemma3 27B");
    }

    #[test]
    fn test_parameterized_fill() {
        let template = PromptTemplate::Parameterized {
            text: "Translate into {language}.",
            option: SubOptionKind::Language,
        };
        assert_eq!(template.fill("English"), "Translate into English.");
        assert_eq!(template.required_option(), Some(SubOptionKind::Language));

        let fixed = PromptTemplate::Fixed("Summarize.");
        assert_eq!(fixed.fill("ignored"), "Summarize.");
        assert_eq!(fixed.required_option(), None);
    }
}
