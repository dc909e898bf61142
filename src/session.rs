//! Per-user resume state shared by analysis and chat

use crate::processing::pipeline::{AnalysisResult, InsightPipeline};
use crate::error::Result;
use crate::llm::{ChatCompletion, ResumeChat};

/// The most recently loaded resume and its analysis
#[derive(Debug, Clone, Default)]
pub struct ResumeSession {
    resume_text: String,
    source: Option<String>,
    analysis: Option<AnalysisResult>,
}

impl ResumeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current resume; any previous analysis is discarded
    pub fn load_resume(&mut self, text: String, source: impl Into<String>) {
        self.resume_text = text;
        self.source = Some(source.into());
        self.analysis = None;
    }

    pub fn analyze(&mut self, pipeline: &InsightPipeline) -> Result<&AnalysisResult> {
        let result = pipeline.analyze(&self.resume_text)?;
        Ok(self.analysis.insert(result))
    }

    pub async fn ask<C: ChatCompletion>(&self, chat: &ResumeChat<C>, question: &str) -> String {
        chat.ask(&self.resume_text, question).await
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn has_resume(&self) -> bool {
        !self.resume_text.is_empty()
    }
}
