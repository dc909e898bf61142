//! Insight pipeline: role classification, skill gap and experience band in one pass

use crate::classifier::{ClassificationArtifacts, RankedRole, RoleClassifier};
use crate::config::Config;
use crate::error::{Result, ResumeInsightError};
use crate::processing::experience::{ExperienceBand, ExperienceEstimator};
use crate::processing::role_skills::RoleSkillTable;
use crate::processing::skill_matcher::{SkillMatch, SkillMatcher};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Structured result of analyzing one resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub predicted_role: String,
    pub top_roles: Vec<RankedRole>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub experience: ExperienceBand,
}

impl AnalysisResult {
    pub fn skill_coverage(&self) -> f32 {
        SkillMatch {
            matched: self.matched.clone(),
            missing: self.missing.clone(),
        }
        .coverage()
    }
}

/// Shares the loaded classifier and role table across requests
pub struct InsightPipeline {
    classifier: Arc<RoleClassifier>,
    table: RoleSkillTable,
    estimator: ExperienceEstimator,
    matchers: HashMap<String, SkillMatcher>,
}

impl InsightPipeline {
    pub fn new(classifier: Arc<RoleClassifier>, table: RoleSkillTable) -> Result<Self> {
        let mut matchers = HashMap::with_capacity(table.len());
        for entry in table.entries() {
            matchers.insert(entry.role.clone(), SkillMatcher::new(entry.skills.as_slice())?);
        }

        let unmapped: Vec<&str> = classifier
            .labels()
            .into_iter()
            .filter(|label| !table.contains(label))
            .collect();
        if !unmapped.is_empty() {
            debug!("Roles without a skill list: {}", unmapped.join(", "));
        }

        Ok(Self {
            classifier,
            table,
            estimator: ExperienceEstimator::new(),
            matchers,
        })
    }

    /// Load the configured bundle and role table
    pub fn from_config(config: &Config, bundle: Option<&str>) -> Result<Self> {
        let bundle_dir = config.bundle_dir(bundle);
        let artifacts = ClassificationArtifacts::from_dir(&bundle_dir)?;
        let classifier = RoleClassifier::load(artifacts)?;

        let table = match &config.skills.table_path {
            Some(path) => {
                info!("Using role skill table from {}", path.display());
                RoleSkillTable::from_toml_file(path)?
            }
            None => RoleSkillTable::builtin(),
        };

        Self::new(Arc::new(classifier), table)
    }

    pub fn analyze(&self, raw_text: &str) -> Result<AnalysisResult> {
        let top_roles = self.classifier.classify(raw_text)?;
        let predicted_role = top_roles
            .first()
            .map(|r| r.role.clone())
            .ok_or_else(|| ResumeInsightError::Model("Classifier returned no roles".to_string()))?;

        let skills = match self.matchers.get(&predicted_role) {
            Some(matcher) => matcher.partition(raw_text),
            None => SkillMatch::default(),
        };

        let experience = self.estimator.estimate(raw_text);

        debug!(
            "{}: {} matched, {} missing, {}",
            predicted_role,
            skills.matched.len(),
            skills.missing.len(),
            experience
        );

        Ok(AnalysisResult {
            predicted_role,
            top_roles,
            matched: skills.matched,
            missing: skills.missing,
            experience,
        })
    }

    pub fn classifier(&self) -> &RoleClassifier {
        &self.classifier
    }

    pub fn table(&self) -> &RoleSkillTable {
        &self.table
    }
}
