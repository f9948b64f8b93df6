//! Builds a [`CompletionRequest`] from the agent choice, user text and
//! attached documents. Pure; no I/O.

use shared::agent::ModelCatalog;
use shared::completion::CompletionRequest;
use shared::document::{UploadedDocument, MAX_ATTACHMENTS};
use shared::error::ComposeError;

use crate::registry::AgentRegistry;

const DOCUMENTS_HEADER: &str = "\n\n--- Contents of uploaded files ---\n";
const SEPARATOR_WIDTH: usize = 50;

pub struct RequestComposer<'a> {
    registry: &'a AgentRegistry,
    catalog: &'a ModelCatalog,
}

impl<'a> RequestComposer<'a> {
    pub fn new(registry: &'a AgentRegistry, catalog: &'a ModelCatalog) -> Self {
        Self { registry, catalog }
    }

    pub fn compose(
        &self,
        agent_id: &str,
        sub_option: Option<&str>,
        free_text: &str,
        documents: &[UploadedDocument],
    ) -> Result<CompletionRequest, ComposeError> {
        let agent = self.registry.lookup(agent_id)?;

        if documents.len() > MAX_ATTACHMENTS {
            return Err(ComposeError::TooManyDocuments {
                count: documents.len(),
                max: MAX_ATTACHMENTS,
            });
        }

        let text = free_text.trim();
        let base = if !text.is_empty() {
            text
        } else if !documents.is_empty() {
            agent.default_file_instruction
        } else {
            return Err(ComposeError::EmptyInput);
        };

        let system_message = match agent.prompt.required_option() {
            None => agent.prompt.fill(""),
            Some(_) => {
                let selection = sub_option.ok_or_else(|| ComposeError::MissingSubOption {
                    agent_id: agent.id.to_string(),
                })?;
                if !agent.accepts_sub_option(selection) {
                    return Err(ComposeError::InvalidSubOption {
                        agent_id: agent.id.to_string(),
                        selection: selection.to_string(),
                    });
                }
                agent.prompt.fill(selection)
            }
        };

        let user_message = append_documents(base, documents);
        let model = self.catalog.model_name(agent.tier);

        tracing::debug!(
            agent = agent.id,
            model,
            documents = documents.len(),
            user_chars = user_message.len(),
            "composed request"
        );
        Ok(CompletionRequest::new(model, system_message, user_message))
    }
}

/// `base` followed by one delimited block per document, 1-indexed, in order.
fn append_documents(base: &str, documents: &[UploadedDocument]) -> String {
    let mut out = base.to_string();
    if documents.is_empty() {
        return out;
    }
    out.push_str(DOCUMENTS_HEADER);
    for (i, doc) in documents.iter().enumerate() {
        out.push_str(&format!("\n=== File {}: {} ===\n", i + 1, doc.filename));
        out.push_str(&doc.text);
        out.push('\n');
        out.push_str(&"=".repeat(SEPARATOR_WIDTH));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(
        agent: &str,
        option: Option<&str>,
        text: &str,
        docs: &[UploadedDocument],
    ) -> Result<CompletionRequest, ComposeError> {
        let registry = AgentRegistry::builtin();
        let catalog = ModelCatalog::default();
        RequestComposer::new(&registry, &catalog).compose(agent, option, text, docs)
    }

    #[test]
    fn test_email_without_documents() {
        let req = compose("email", None, "meeting next week", &[]).unwrap();
        let registry = AgentRegistry::builtin();
        let email = registry.lookup("email").unwrap();

        assert_eq!(req.system_message(), email.prompt.text());
        assert_eq!(req.user_message(), "meeting next week");
        assert_eq!(req.model(), "Nemotron Ultra 253B");
    }

    #[test]
    fn test_empty_input_without_documents() {
        for agent in ["summarize", "translate", "code"] {
            let err = compose(agent, Some("Python"), "   \n\t", &[]).unwrap_err();
            assert_eq!(err, ComposeError::EmptyInput);
        }
    }

    #[test]
    fn test_unknown_agent_checked_first() {
        let err = compose("limerick", None, "", &[]).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownAgent { .. }));
    }

    #[test]
    fn test_default_instruction_for_file_only() {
        let docs = vec![UploadedDocument::new("q3.csv", "a,b\n1,2")];
        let req = compose("analyze", None, "", &docs).unwrap();

        let expected_base = "Please analyze the data from the file.";
        assert!(req.user_message().starts_with(expected_base));
        assert_eq!(
            &req.user_message()[expected_base.len()..expected_base.len() + DOCUMENTS_HEADER.len()],
            DOCUMENTS_HEADER
        );
        assert_eq!(req.model(), "Nemotron Ultra 253B (Reasoning)");
    }

    #[test]
    fn test_translation_requires_language() {
        let err = compose("translate", None, "Hallo Welt", &[]).unwrap_err();
        assert_eq!(
            err,
            ComposeError::MissingSubOption {
                agent_id: "translate".into()
            }
        );

        let err = compose("translate", Some("Klingon"), "Hallo Welt", &[]).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidSubOption { ref selection, .. } if selection == "Klingon"));
    }

    #[test]
    fn test_language_substituted() {
        let req = compose("translate", Some("English"), "Hallo Welt", &[]).unwrap();
        assert!(req.system_message().contains("precisely into English."));
        assert!(!req.system_message().contains("{language}"));

        let req = compose("code", Some("Rust"), "parse a CSV file", &[]).unwrap();
        assert!(req.system_message().starts_with("You are an experienced Rust developer."));
        assert_eq!(req.model(), "Qwen2.5 Coder 32B");
    }

    #[test]
    fn test_fixed_prompt_ignores_selection() {
        let req = compose("summarize", Some("English"), "text", &[]).unwrap();
        let plain = compose("summarize", None, "text", &[]).unwrap();
        assert_eq!(req, plain);
    }

    #[test]
    fn test_document_blocks_in_upload_order() {
        let docs = vec![
            UploadedDocument::new("b.txt", "second upload? no, first"),
            UploadedDocument::new("a.pdf", "page text"),
            UploadedDocument::new("c.docx", ""),
        ];
        let req = compose("summarize", None, "Compare these", &docs).unwrap();
        let sep = "=".repeat(50);
        let expected = format!(
            "Compare these\n\n--- Contents of uploaded files ---\n\
             \n=== File 1: b.txt ===\nsecond upload? no, first\n{sep}\n\
             \n=== File 2: a.pdf ===\npage text\n{sep}\n\
             \n=== File 3: c.docx ===\n\n{sep}\n",
            sep = sep
        );
        assert_eq!(req.user_message(), expected);
    }

    #[test]
    fn test_free_text_is_trimmed() {
        let req = compose("research", None, "  solar power \n", &[]).unwrap();
        assert_eq!(req.user_message(), "solar power");
    }

    #[test]
    fn test_more_than_three_documents_rejected() {
        let docs: Vec<UploadedDocument> = (0..4)
            .map(|i| UploadedDocument::new(format!("{}.txt", i), "x"))
            .collect();
        let err = compose("summarize", None, "x", &docs).unwrap_err();
        assert_eq!(err, ComposeError::TooManyDocuments { count: 4, max: 3 });
    }
}
