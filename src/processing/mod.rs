//! Text processing and analysis module

pub mod experience;
pub mod normalizer;
pub mod pipeline;
pub mod role_skills;
pub mod skill_matcher;

pub use experience::{ExperienceBand, ExperienceEstimator};
pub use normalizer::TextNormalizer;
pub use pipeline::{AnalysisResult, InsightPipeline};
pub use role_skills::{RoleSkillTable, RoleSkills};
pub use skill_matcher::{match_skills, SkillMatch, SkillMatcher};
