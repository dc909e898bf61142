//! Report structures wrapping an analysis result for presentation

use crate::classifier::RankedRole;
use crate::processing::experience::ExperienceBand;
use crate::processing::pipeline::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Analysis result plus the context needed to present or archive it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub summary: InsightSummary,
    pub analysis: AnalysisResult,
    pub metadata: ReportMetadata,
    /// Leading part of the extracted resume text, for detailed output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_preview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSummary {
    pub predicted_role: String,
    pub confidence: f64,
    pub experience: ExperienceBand,
    /// Share of the role's expected skills found in the resume (0-100)
    pub skill_coverage_percentage: u8,
    pub verdict: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub artifact_bundle: String,
    pub processing_time_ms: u64,
}

impl InsightReport {
    pub fn new(analysis: AnalysisResult, resume_file: &str, artifact_bundle: &str, processing_time_ms: u64) -> Self {
        let summary = InsightSummary::from_analysis(&analysis);

        Self {
            summary,
            analysis,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.to_string(),
                artifact_bundle: artifact_bundle.to_string(),
                processing_time_ms,
            },
            resume_preview: None,
        }
    }

    pub fn with_resume_preview(mut self, preview: String) -> Self {
        self.resume_preview = Some(preview);
        self
    }

    pub fn top_roles(&self) -> &[RankedRole] {
        &self.analysis.top_roles
    }
}

impl InsightSummary {
    fn from_analysis(analysis: &AnalysisResult) -> Self {
        let confidence = analysis.top_roles.first().map(|r| r.confidence).unwrap_or(0.0);
        let coverage = (analysis.skill_coverage() * 100.0).round() as u8;
        let expected = analysis.matched.len() + analysis.missing.len();

        Self {
            predicted_role: analysis.predicted_role.clone(),
            confidence,
            experience: analysis.experience,
            skill_coverage_percentage: coverage,
            verdict: verdict(coverage, expected),
        }
    }
}

fn verdict(coverage: u8, expected_skills: usize) -> String {
    if expected_skills == 0 {
        return "No expected skill list for this role".to_string();
    }
    match coverage {
        80..=100 => "Strong match for the predicted role",
        50..=79 => "Good foundation with a few skill gaps",
        25..=49 => "Partial match; several expected skills are missing",
        _ => "Most expected skills for this role are missing",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(matched: &[&str], missing: &[&str]) -> AnalysisResult {
        AnalysisResult {
            predicted_role: "Python Developer".to_string(),
            top_roles: vec![
                RankedRole { role: "Python Developer".to_string(), confidence: 81.25 },
                RankedRole { role: "Data Science".to_string(), confidence: 10.5 },
            ],
            matched: matched.iter().map(|s| s.to_string()).collect(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
            experience: ExperienceBand::Junior,
        }
    }

    #[test]
    fn test_summary_from_analysis() {
        let report = InsightReport::new(
            analysis(&["Python", "Django", "SQL"], &["Flask"]),
            "cv.pdf",
            "resume-role-classifier",
            12,
        );

        assert_eq!(report.summary.confidence, 81.25);
        assert_eq!(report.summary.skill_coverage_percentage, 75);
        assert_eq!(report.summary.verdict, "Good foundation with a few skill gaps");
        assert_eq!(report.metadata.resume_file, "cv.pdf");
        assert_eq!(report.top_roles().len(), 2);
    }

    #[test]
    fn test_verdict_without_skill_list() {
        let report = InsightReport::new(analysis(&[], &[]), "cv.txt", "b", 0);
        assert_eq!(report.summary.skill_coverage_percentage, 0);
        assert_eq!(report.summary.verdict, "No expected skill list for this role");
    }

    #[test]
    fn test_preview_omitted_from_json_when_absent() {
        let report = InsightReport::new(analysis(&["Python"], &[]), "cv.txt", "b", 0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("resume_preview").is_none());

        let report = report.with_resume_preview("Jane Doe".to_string());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["resume_preview"], "Jane Doe");
    }
}
