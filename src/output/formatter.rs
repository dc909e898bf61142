//! Output formatters for insight reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::InsightReport;
use crate::processing::experience::ExperienceBand;
use colored::{Color, Colorize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

pub trait OutputFormatter {
    fn format_report(&self, report: &InsightReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_confidence_badge(&self, confidence: f64) -> String {
        let (badge, color) = match confidence {
            c if c >= 75.0 => ("HIGH", Color::Green),
            c if c >= 40.0 => ("MEDIUM", Color::Yellow),
            _ => ("LOW", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_skill_list(&self, skills: &[String], color: Color, marker: &str) -> String {
        if skills.is_empty() {
            return "  (none)\n".to_string();
        }
        skills
            .iter()
            .map(|skill| format!("  {} {}\n", self.colorize(marker, color), skill))
            .collect()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &InsightReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;
        let analysis = &report.analysis;

        output.push_str(&self.format_header("RESUME INSIGHTS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Predicted Role", 2));
        output.push_str(&format!(
            "{} ({:.2}%) {}\n",
            self.colorize(&summary.predicted_role, Color::Cyan),
            summary.confidence,
            self.format_confidence_badge(summary.confidence)
        ));
        output.push_str(&format!(
            "Experience: {}\n",
            self.colorize(summary.experience.label(), experience_color(summary.experience))
        ));
        output.push_str(&format!(
            "Skill coverage: {}% | {}\n",
            summary.skill_coverage_percentage, summary.verdict
        ));

        output.push_str(&self.format_header("Top Roles", 3));
        for (i, role) in analysis.top_roles.iter().enumerate() {
            output.push_str(&format!("  {}. {:<30} {:>6.2}%\n", i + 1, role.role, role.confidence));
        }

        output.push_str(&self.format_header("Matched Skills", 3));
        output.push_str(&self.format_skill_list(&analysis.matched, Color::Green, "+"));

        output.push_str(&self.format_header("Missing Skills", 3));
        output.push_str(&self.format_skill_list(&analysis.missing, Color::Red, "-"));

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!("Resume: {}\n", report.metadata.resume_file));
            output.push_str(&format!("Artifact bundle: {}\n", report.metadata.artifact_bundle));
            output.push_str(&format!("Version: {}\n", report.metadata.tool_version));
            if let Some(preview) = &report.resume_preview {
                output.push_str(&format!("\nResume preview:\n{}\n", truncate_text(preview, 300)));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

fn experience_color(band: ExperienceBand) -> Color {
    match band {
        ExperienceBand::Senior => Color::Green,
        ExperienceBand::MidLevel => Color::BrightGreen,
        ExperienceBand::Junior | ExperienceBand::Fresher => Color::Yellow,
        ExperienceBand::NotMentioned => Color::White,
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &InsightReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &InsightReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;
        let analysis = &report.analysis;

        output.push_str("# Resume Insights Report\n\n");

        if self.include_metadata {
            let resume_name = Path::new(&report.metadata.resume_file)
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| report.metadata.resume_file.clone());

            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Bundle:** `{}`\n\n",
                resume_name, report.metadata.artifact_bundle
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Predicted Role:** {} ({:.2}%)\n\n",
            summary.predicted_role, summary.confidence
        ));
        output.push_str(&format!("**Experience:** {}\n\n", summary.experience));
        output.push_str(&format!(
            "**Skill Coverage:** {}% ({})\n\n",
            summary.skill_coverage_percentage, summary.verdict
        ));

        output.push_str("## Top Roles\n\n");
        output.push_str("| Rank | Role | Confidence |\n");
        output.push_str("|------|------|------------|\n");
        for (i, role) in analysis.top_roles.iter().enumerate() {
            output.push_str(&format!("| {} | {} | {:.2}% |\n", i + 1, role.role, role.confidence));
        }
        output.push('\n');

        output.push_str("## Matched Skills\n\n");
        output.push_str(&markdown_list(&analysis.matched, "[x]"));

        output.push_str("## Missing Skills\n\n");
        output.push_str(&markdown_list(&analysis.missing, "[ ]"));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn markdown_list(skills: &[String], checkbox: &str) -> String {
    if skills.is_empty() {
        return "_None_\n\n".to_string();
    }
    let mut list: String = skills.iter().map(|s| format!("- {} {}\n", checkbox, s)).collect();
    list.push('\n');
    list
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &InsightReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_insights{}.{}", base_name, timestamp_suffix, extension)
}

/// Truncate to at most `max_graphemes` user-perceived characters, preferring a word boundary
pub fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.grapheme_indices(true);
    let cut = match graphemes.nth(max_graphemes) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };

    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RankedRole;
    use crate::processing::pipeline::AnalysisResult;
    use tempfile::TempDir;

    fn sample_report() -> InsightReport {
        let analysis = AnalysisResult {
            predicted_role: "Java Developer".to_string(),
            top_roles: vec![
                RankedRole { role: "Java Developer".to_string(), confidence: 72.4 },
                RankedRole { role: "Automation Testing".to_string(), confidence: 15.1 },
                RankedRole { role: "Testing".to_string(), confidence: 4.25 },
            ],
            matched: vec!["Java".to_string(), "Spring".to_string()],
            missing: vec!["Maven".to_string()],
            experience: ExperienceBand::MidLevel,
        };
        InsightReport::new(analysis, "/tmp/jane_doe.pdf", "resume-role-classifier", 8)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Java Developer (72.40%) [MEDIUM]"));
        assert!(output.contains("Experience: Mid-Level"));
        assert!(output.contains("  + Java\n"));
        assert!(output.contains("  - Maven\n"));
        assert!(!output.contains("Artifact bundle"));
    }

    #[test]
    fn test_console_detailed_shows_preview() {
        let report = sample_report().with_resume_preview("Jane Doe, Java engineer".to_string());
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();

        assert!(output.contains("Artifact bundle: resume-role-classifier"));
        assert!(output.contains("Jane Doe, Java engineer"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let parsed: InsightReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.analysis, sample_report().analysis);
        assert!(json.contains("\"experience\":\"Mid-Level\""));
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();

        assert!(output.contains("**Resume:** `jane_doe.pdf`"));
        assert!(output.contains("| 3 | Testing | 4.25% |"));
        assert!(output.contains("- [x] Java\n"));
        assert!(output.contains("- [ ] Maven\n"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, false);
        let report = sample_report();

        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        let markdown = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
        assert!(!markdown.contains("**Generated:**"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "resumes/jane_doe.docx", false),
            "jane_doe_insights.md"
        );
        let stamped = suggest_filename(&OutputFormat::Json, "cv.pdf", true);
        assert!(stamped.starts_with("cv_insights_") && stamped.ends_with(".json"));
    }

    #[test]
    fn test_save_report_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.md");

        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi");
    }

    #[test]
    fn test_truncate_on_grapheme_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("hello wonderful world", 12), "hello...");
        // combining accents stay attached to their base letter
        let text = "e\u{301}e\u{301}e\u{301}e\u{301}";
        assert_eq!(truncate_text(text, 2), "e\u{301}e\u{301}...");
    }
}
