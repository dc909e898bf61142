//! Resume question answering over a chat completion service

use crate::error::ResumeInsightError;
use crate::llm::client::ChatCompletion;
use crate::llm::prompts::PromptTemplates;
use log::warn;
use regex::Regex;

pub const NO_RESUME_MESSAGE: &str = "Please upload resume first.";
pub const INVALID_QUESTION_MESSAGE: &str = "Ask a valid question.";

pub struct ResumeChat<C> {
    client: C,
    prompts: PromptTemplates,
    markup_regex: Regex,
    whitespace_regex: Regex,
}

impl<C: ChatCompletion> ResumeChat<C> {
    pub fn new(client: C) -> Self {
        Self::with_prompts(client, PromptTemplates::default())
    }

    pub fn with_prompts(client: C, prompts: PromptTemplates) -> Self {
        let markup_regex = Regex::new(r"[*#•\-]").expect("Invalid markup regex");
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            client,
            prompts,
            markup_regex,
            whitespace_regex,
        }
    }

    /// Answer `question` about `resume_text`.
    ///
    /// Always returns text for the user: missing input yields a guidance
    /// message without contacting the service, and service failures come
    /// back as a "Chat error: ..." line.
    pub async fn ask(&self, resume_text: &str, question: &str) -> String {
        if resume_text.is_empty() {
            return NO_RESUME_MESSAGE.to_string();
        }
        if question.trim().is_empty() {
            return INVALID_QUESTION_MESSAGE.to_string();
        }

        let messages = self.prompts.messages(resume_text, question);
        match self.client.complete(&messages).await {
            Ok(reply) => self.sanitize(&reply),
            Err(e) => {
                warn!("Chat request failed: {}", e);
                match e {
                    ResumeInsightError::Chat(detail) => format!("Chat error: {}", detail),
                    other => format!("Chat error: {}", other),
                }
            }
        }
    }

    /// Strip markdown-ish punctuation and flatten the reply to one paragraph
    pub fn sanitize(&self, reply: &str) -> String {
        let stripped = self.markup_regex.replace_all(reply.trim(), "");
        self.whitespace_regex
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}
