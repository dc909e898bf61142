//! Prompt templates for resume questions

use crate::llm::client::ChatMessage;
use regex::{Captures, Regex};

const SYSTEM_PROMPT: &str = "You are a professional resume evaluator. \
Give clear, simple, professional answers. \
Do not use bullet points, stars, bold text, or any symbols. \
Respond in plain clean paragraphs only.";

const QUESTION_TEMPLATE: &str = "Resume:\n{resume}\n\nQuestion:\n{question}";

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub question: String,
    placeholder_regex: Regex,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::new(SYSTEM_PROMPT, QUESTION_TEMPLATE)
    }
}

impl PromptTemplates {
    /// `question` may use the `{resume}` and `{question}` placeholders in any order
    pub fn new(system: impl Into<String>, question: impl Into<String>) -> Self {
        let placeholder_regex = Regex::new(r"\{(resume|question)\}").expect("Invalid placeholder regex");

        Self {
            system: system.into(),
            question: question.into(),
            placeholder_regex,
        }
    }

    /// Fill the question template in a single pass; substituted text is never rescanned
    pub fn render_question(&self, resume_text: &str, question: &str) -> String {
        self.placeholder_regex
            .replace_all(&self.question, |caps: &Captures| match &caps[1] {
                "resume" => resume_text,
                _ => question,
            })
            .into_owned()
    }

    /// System and user messages for one resume question
    pub fn messages(&self, resume_text: &str, question: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(&self.system),
            ChatMessage::user(self.render_question(resume_text, question)),
        ]
    }
}
