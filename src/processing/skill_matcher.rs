//! Skill presence matching against raw resume text

use crate::error::{Result, ResumeInsightError};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ordered partition of a skill list into found and absent skills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillMatch {
    /// Fraction of the target skills found in the resume, 0.0 for an empty target list
    pub fn coverage(&self) -> f32 {
        let total = self.matched.len() + self.missing.len();
        if total == 0 {
            0.0
        } else {
            self.matched.len() as f32 / total as f32
        }
    }
}

/// Case-insensitive substring matcher for a fixed, ordered skill list
pub struct SkillMatcher {
    skills: Vec<String>,
    automaton: AhoCorasick,
    // lowercased, non-empty, de-duplicated patterns in automaton order
    patterns: Vec<String>,
    pattern_ids: HashMap<String, usize>,
}

impl SkillMatcher {
    pub fn new<S: AsRef<str>>(skills: &[S]) -> Result<Self> {
        let skills: Vec<String> = skills.iter().map(|s| s.as_ref().to_string()).collect();

        let mut patterns = Vec::new();
        let mut pattern_ids = HashMap::new();
        for skill in &skills {
            let lowered = skill.to_lowercase();
            if lowered.is_empty() || pattern_ids.contains_key(&lowered) {
                continue;
            }
            pattern_ids.insert(lowered.clone(), patterns.len());
            patterns.push(lowered);
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ResumeInsightError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            skills,
            automaton,
            patterns,
            pattern_ids,
        })
    }

    /// Partition the skill list by presence in `text`, preserving input order
    pub fn partition(&self, text: &str) -> SkillMatch {
        let lowered = text.to_lowercase();

        let found: HashSet<usize> = self
            .automaton
            .find_overlapping_iter(&lowered)
            .map(|m| m.pattern().as_usize())
            .collect();

        let mut result = SkillMatch::default();
        for skill in &self.skills {
            let lowered_skill = skill.to_lowercase();
            let present = lowered_skill.is_empty()
                || self
                    .pattern_ids
                    .get(&lowered_skill)
                    .is_some_and(|id| found.contains(id));

            if present {
                result.matched.push(skill.clone());
            } else {
                result.missing.push(skill.clone());
            }
        }

        result
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// One-shot matching for an arbitrary skill list
pub fn match_skills<S: AsRef<str>>(text: &str, skills: &[S]) -> Result<SkillMatch> {
    Ok(SkillMatcher::new(skills)?.partition(text))
}
