//! The six built-in agents and lookup by identifier.
//!
//! The registry is built once and only read afterwards; callers hold it by
//! reference next to the [`ModelCatalog`](shared::ModelCatalog) from settings.

use shared::agent::{AgentDefinition, ModelTier, PromptTemplate, SubOptionKind};
use shared::error::ComposeError;

pub const TRANSLATION_LANGUAGES: &[&str] = &[
    "Deutsch",
    "English",
    "Français",
    "Español",
    "Italiano",
    "Nederlands",
];

pub const PROGRAMMING_LANGUAGES: &[&str] =
    &["Python", "JavaScript", "Java", "C++", "PHP", "Go", "Rust"];

/// Immutable table of agent definitions in display order.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentDefinition>,
}

impl AgentRegistry {
    pub fn builtin() -> Self {
        Self {
            agents: vec![
                SUMMARIZE.clone(),
                TRANSLATE.clone(),
                EMAIL.clone(),
                ANALYZE.clone(),
                RESEARCH.clone(),
                CODE.clone(),
            ],
        }
    }

    pub fn lookup(&self, agent_id: &str) -> Result<&AgentDefinition, ComposeError> {
        self.agents
            .iter()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| ComposeError::UnknownAgent {
                agent_id: agent_id.to_string(),
            })
    }

    pub fn agents(&self) -> &[AgentDefinition] {
        &self.agents
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static SUMMARIZE: AgentDefinition = AgentDefinition {
    id: "summarize",
    label: "Summarize text",
    tier: ModelTier::Standard,
    prompt: PromptTemplate::Fixed(
        "You are an expert in summarizing texts. Create a precise, structured summary of the following text. Use bullet points and highlight the most important aspects.",
    ),
    placeholder: "Enter the text you want summarized...",
    example: "A long article, report or document text",
    default_file_instruction: "Please summarize the contents of the file.",
    sub_options: &[],
    default_sub_option: None,
};

static TRANSLATE: AgentDefinition = AgentDefinition {
    id: "translate",
    label: "Translate text",
    tier: ModelTier::Standard,
    prompt: PromptTemplate::Parameterized {
        text: "You are a professional translator. Translate the following text precisely into {language}. Pay attention to context, style and cultural nuances.",
        option: SubOptionKind::Language,
    },
    placeholder: "Enter the text you want translated...",
    example: "'Hello, how are you today?'",
    default_file_instruction: "Please translate the contents of the file.",
    sub_options: TRANSLATION_LANGUAGES,
    default_sub_option: Some("Deutsch"),
};

static EMAIL: AgentDefinition = AgentDefinition {
    id: "email",
    label: "Write an email",
    tier: ModelTier::Standard,
    prompt: PromptTemplate::Fixed(
        "You are an expert in professional communication. Based on the following notes, write a polite, professional email with a subject line, greeting, structured body and an appropriate closing.",
    ),
    placeholder: "Describe what the email should say:\n\n- Schedule a meeting next week\n- Agenda: budget and planning\n- Attendees: all department heads",
    example: "Bullet points for the email content",
    default_file_instruction: "Please write an email based on the contents of the file.",
    sub_options: &[],
    default_sub_option: None,
};

static ANALYZE: AgentDefinition = AgentDefinition {
    id: "analyze",
    label: "Analyze data",
    tier: ModelTier::Reasoning,
    prompt: PromptTemplate::Fixed(
        "You are a data analyst. Analyze the provided information in a structured way. Produce an analysis with: 1) Key findings, 2) Trends/patterns, 3) Concrete recommendations.",
    ),
    placeholder: "Paste your data here:\n\nSales 2024:\nQ1: 150,000\nQ2: 180,000\nQ3: 165,000\nQ4: 195,000",
    example: "Numbers, statistics or information to analyze",
    default_file_instruction: "Please analyze the data from the file.",
    sub_options: &[],
    default_sub_option: None,
};

static RESEARCH: AgentDefinition = AgentDefinition {
    id: "research",
    label: "Research a topic",
    tier: ModelTier::Reasoning,
    prompt: PromptTemplate::Fixed(
        "You are a research expert. Carry out a structured analysis of the topic. Organize your answer as: 1) Overview, 2) Key aspects, 3) Current developments, 4) Conclusion/outlook.",
    ),
    placeholder: "Name the topic, e.g. 'Artificial intelligence in medicine'",
    example: "A topic to research",
    default_file_instruction: "Please create an analysis based on the file contents.",
    sub_options: &[],
    default_sub_option: None,
};

static CODE: AgentDefinition = AgentDefinition {
    id: "code",
    label: "Generate code",
    tier: ModelTier::Code,
    prompt: PromptTemplate::Parameterized {
        text: "You are an experienced {language} developer. Write clean, efficient and well-documented code. Briefly explain what the code does.",
        option: SubOptionKind::ProgrammingLanguage,
    },
    placeholder: "Describe the code you need:\n\n- A function that reads CSV files\n- A program that sorts lists\n- A simple web page with a form",
    example: "Description of the code requirements",
    default_file_instruction: "Please write code based on the requirements in the file.",
    sub_options: PROGRAMMING_LANGUAGES,
    default_sub_option: Some("Python"),
};
