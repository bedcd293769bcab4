//! Prompt Builder System
//!
//! Ordered, section-based prompt construction. Section order is preserved
//! exactly so that prompts are reproducible given the same inputs.

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Ordered key-value context
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Bulleted list under a header
    Bullets { header: String, items: Vec<String> },
    /// Code block with language
    Code { language: String, content: String },
    /// Instruction that overrides everything before it
    Priority(String),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item; consecutive items share one context block
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        if let Some(PromptSection::Context(ctx)) = self.sections.last_mut() {
            ctx.push((key.to_string(), value.to_string()));
        } else {
            self.sections.push(PromptSection::Context(vec![(
                key.to_string(),
                value.to_string(),
            )]));
        }
        self
    }

    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    pub fn bullets(mut self, header: &str, items: Vec<String>) -> Self {
        self.sections.push(PromptSection::Bullets {
            header: header.to_string(),
            items,
        });
        self
    }

    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn priority(mut self, instruction: &str) -> Self {
        self.sections
            .push(PromptSection::Priority(instruction.to_string()));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n",
                        expertise, task
                    ));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Context(ctx) => {
                    prompt.push_str("# Context\n\n");
                    for (key, value) in ctx {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Bullets { header, items } => {
                    prompt.push_str(&format!("# {}\n\n", header));
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
                PromptSection::Priority(instruction) => {
                    prompt.push_str("<HIGHEST_PRIORITY>\n");
                    prompt.push_str(&instruction);
                    prompt.push_str("\n</HIGHEST_PRIORITY>\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}
