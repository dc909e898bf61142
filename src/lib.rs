//! Resume insight library: role classification, skill gaps, experience bands and resume chat

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;
pub mod session;

pub use classifier::{ClassificationArtifacts, RankedRole, RoleClassifier};
pub use config::Config;
pub use error::{Result, ResumeInsightError};
pub use processing::pipeline::{AnalysisResult, InsightPipeline};
pub use session::ResumeSession;
