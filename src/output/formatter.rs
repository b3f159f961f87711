//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, ResumeMatcherError};
use crate::output::report::{MatchReport, ProfileReport, ReportMetadata};
use crate::processing::insights::{CareerSummary, ProfileInsights};
use crate::processing::matcher::{ConfidenceLevel, MatchResult};
use crate::processing::profile::{ExperienceLevel, ResumeProfile};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting reports
pub trait OutputFormatter {
    fn format_profile(&self, report: &ProfileReport) -> Result<String>;
    fn format_matches(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
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

/// Report generator that coordinates the formatters
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

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score.round() as u8 {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::BrightGreen),
            40..=59 => ("FAIR", Color::Yellow),
            20..=39 => ("WEAK", Color::BrightRed),
            _ => ("POOR", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_profile_body(&self, profile: &ResumeProfile, output: &mut String) {
        output.push_str(&format!(
            "Experience: {} ({:.0} years) | Confidence: {:.0}%\n",
            self.colorize(&profile.experience_level.to_string(), level_color(profile.experience_level)),
            profile.years_of_experience,
            profile.confidence_score * 100.0
        ));

        if !profile.job_titles.is_empty() {
            output.push_str(&format!("Titles: {}\n", profile.job_titles.join(", ")));
        }

        if profile.skills.is_empty() {
            output.push_str(&self.colorize("No skills detected\n", Color::Yellow));
        } else {
            let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
            output.push_str(&format!("Skills ({}): {}\n", skills.len(), skills.join(", ")));
        }

        for entry in &profile.education {
            let parts: Vec<&str> = [&entry.degree, &entry.institution, &entry.year]
                .into_iter()
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .collect();
            output.push_str(&format!("  🎓 {}\n", parts.join(" | ")));
        }
    }

    fn format_match(&self, index: usize, result: &MatchResult) -> String {
        let mut output = format!(
            "{:>2}. {} {:.1}% {}\n",
            index,
            self.colorize(&result.job.title, Color::Cyan),
            result.score,
            self.format_score_badge(result.score)
        );

        let mut origin = Vec::new();
        if !result.job.company.is_empty() {
            origin.push(result.job.company.as_str());
        }
        if let Some(location) = &result.job.location {
            origin.push(location.as_str());
        }
        if !origin.is_empty() {
            output.push_str(&format!("    {}\n", origin.join(" • ")));
        }

        output.push_str(&format!("    {}\n", result.explanation));

        if self.detailed {
            let matched: Vec<&str> = result.matched_skills.iter().map(String::as_str).collect();
            let missing: Vec<&str> = result.missing_skills.iter().map(String::as_str).collect();
            if !matched.is_empty() {
                output.push_str(&format!("    ✓ {}\n", self.colorize(&matched.join(", "), Color::Green)));
            }
            if !missing.is_empty() {
                output.push_str(&format!("    ✗ {}\n", self.colorize(&missing.join(", "), Color::Red)));
            }
            output.push_str(&format!("    Confidence: {}\n", result.confidence_level));
        }

        output
    }

    fn format_insights(&self, insights: &ProfileInsights, output: &mut String) {
        if insights.tech_stacks.is_empty() {
            return;
        }
        output.push_str(&self.format_header("Technology stacks", 2));
        for stack in &insights.tech_stacks {
            output.push_str(&format!("  • {} ({:.0}%)\n", stack.name, stack.score * 100.0));
        }
        if !insights.role_recommendations.is_empty() {
            output.push_str(&format!("Suggested roles: {}\n", insights.role_recommendations.join(", ")));
        }
        if !insights.skill_gaps.is_empty() {
            output.push_str(&format!(
                "To round out {}: {}\n",
                insights.primary_stack.as_deref().unwrap_or("the primary stack"),
                self.colorize(&insights.skill_gaps.join(", "), Color::Yellow)
            ));
        }
    }

    fn format_career(&self, report: &MatchReport, output: &mut String) {
        let career: &CareerSummary = &report.career;
        output.push_str(&self.format_header("Career summary", 2));
        if let Some(best) = report.best_score() {
            output.push_str(&format!(
                "Best {:.1}% | Average {:.1}% | {} strong, {} medium\n",
                best,
                report.average_score(),
                career.high_quality_matches,
                career.medium_quality_matches
            ));
        }
        if !career.top_skill_gaps.is_empty() {
            output.push_str(&format!(
                "Most requested skills you lack: {}\n",
                self.colorize(&career.top_skill_gaps.join(", "), Color::Yellow)
            ));
        }
        for recommendation in &career.recommendations {
            output.push_str(&format!("  → {}\n", recommendation));
        }
    }

    fn format_metadata(&self, metadata: &ReportMetadata) -> String {
        let generated = chrono::DateTime::<chrono::Utc>::from(metadata.generated_at);
        self.colorize(
            &format!(
                "Generated: {} | Processing time: {}ms | Extracted with {}\n",
                generated.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.processing_time_ms,
                metadata.extraction_backend
            ),
            Color::BrightBlack,
        )
    }
}

fn level_color(level: ExperienceLevel) -> Color {
    match level {
        ExperienceLevel::Senior => Color::Green,
        ExperienceLevel::Mid => Color::Cyan,
        ExperienceLevel::Entry => Color::Yellow,
        ExperienceLevel::Unknown => Color::BrightBlack,
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_profile(&self, report: &ProfileReport) -> Result<String> {
        let mut output = self.format_header("📄 RESUME PROFILE", 1);
        output.push_str(&self.format_metadata(&report.metadata));
        output.push('\n');
        self.format_profile_body(&report.profile, &mut output);

        if self.detailed && !report.skills_by_category.is_empty() {
            output.push_str(&self.format_header("Skills by category", 2));
            for (category, skills) in &report.skills_by_category {
                output.push_str(&format!("  • {}: {}\n", category, skills.join(", ")));
            }
        }
        self.format_insights(&report.insights, &mut output);

        Ok(output)
    }

    fn format_matches(&self, report: &MatchReport) -> Result<String> {
        let mut output = self.format_header("💼 JOB MATCHES", 1);
        output.push_str(&self.format_metadata(&report.metadata));
        output.push('\n');
        self.format_profile_body(&report.profile, &mut output);

        let mut heading = format!("{} of {} postings", report.matches.len(), report.jobs_considered);
        if let Some(query) = &report.search_query {
            heading.push_str(&format!(" for \"{}\"", query));
        }
        output.push_str(&self.format_header(&heading, 2));

        if report.matches.is_empty() {
            output.push_str(&self.colorize("No postings reached the minimum score\n", Color::Yellow));
        }
        for (index, result) in report.matches.iter().enumerate() {
            output.push_str(&self.format_match(index + 1, result));
        }
        self.format_career(report, &mut output);

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_profile(&self, report: &ProfileReport) -> Result<String> {
        self.render(report)
    }

    fn format_matches(&self, report: &MatchReport) -> Result<String> {
        self.render(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_confidence_badge(level: ConfidenceLevel) -> &'static str {
        match level {
            ConfidenceLevel::High => "🟢 High",
            ConfidenceLevel::Medium => "🟡 Medium",
            ConfidenceLevel::Low => "🟠 Low",
            ConfidenceLevel::VeryLow => "🔴 Very low",
        }
    }

    fn metadata_line(&self, metadata: &ReportMetadata) -> Result<String> {
        if !self.include_metadata {
            return Ok(String::new());
        }
        let file_name = Path::new(&metadata.resume_file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                ResumeMatcherError::OutputFormatting(format!("Invalid resume path: {}", metadata.resume_file))
            })?;
        Ok(format!(
            "**Generated:** {} | **Resume:** `{}` | **Backend:** {}\n\n",
            chrono::DateTime::<chrono::Utc>::from(metadata.generated_at).format("%Y-%m-%d %H:%M:%S UTC"),
            file_name,
            metadata.extraction_backend
        ))
    }

    fn profile_section(profile: &ResumeProfile) -> String {
        let mut output = String::from("## Profile\n\n");
        output.push_str(&format!(
            "- **Experience level:** {} ({:.0} years)\n",
            profile.experience_level, profile.years_of_experience
        ));
        output.push_str(&format!("- **Confidence:** {:.0}%\n", profile.confidence_score * 100.0));
        if !profile.job_titles.is_empty() {
            output.push_str(&format!("- **Titles:** {}\n", profile.job_titles.join(", ")));
        }
        let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
        output.push_str(&format!("- **Skills:** {}\n\n", if skills.is_empty() { "none".to_string() } else { skills.join(", ") }));

        if !profile.education.is_empty() {
            output.push_str("### Education\n\n");
            output.push_str("| Degree | Institution | Year |\n");
            output.push_str("|--------|-------------|------|\n");
            for entry in &profile.education {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    escape_cell(&entry.degree),
                    escape_cell(&entry.institution),
                    escape_cell(&entry.year)
                ));
            }
            output.push('\n');
        }
        output
    }
}

fn markdown_insights(insights: &ProfileInsights) -> String {
    if insights.tech_stacks.is_empty() {
        return String::new();
    }
    let mut output = String::from("### Technology stacks\n\n");
    for stack in &insights.tech_stacks {
        output.push_str(&format!("- {} ({:.0}%)\n", stack.name, stack.score * 100.0));
    }
    if !insights.role_recommendations.is_empty() {
        output.push_str(&format!("\n**Suggested roles:** {}\n", insights.role_recommendations.join(", ")));
    }
    if !insights.skill_gaps.is_empty() {
        output.push_str(&format!("\n**Skill gaps:** {}\n", insights.skill_gaps.join(", ")));
    }
    output.push('\n');
    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl OutputFormatter for MarkdownFormatter {
    fn format_profile(&self, report: &ProfileReport) -> Result<String> {
        let mut output = String::from("# Resume Profile\n\n");
        output.push_str(&self.metadata_line(&report.metadata)?);
        output.push_str(&Self::profile_section(&report.profile));

        if !report.skills_by_category.is_empty() {
            output.push_str("### Skills by category\n\n");
            for (category, skills) in &report.skills_by_category {
                output.push_str(&format!("- **{}:** {}\n", category, skills.join(", ")));
            }
            output.push('\n');
        }
        output.push_str(&markdown_insights(&report.insights));
        Ok(output)
    }

    fn format_matches(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::from("# Job Matches\n\n");
        output.push_str(&self.metadata_line(&report.metadata)?);
        output.push_str(&format!(
            "**Query:** {} | **Postings considered:** {} | **Matches:** {}\n\n",
            report.search_query.as_deref().unwrap_or("all postings"),
            report.jobs_considered,
            report.matches.len()
        ));
        output.push_str(&Self::profile_section(&report.profile));

        output.push_str("## Matches\n\n");
        output.push_str("| # | Title | Company | Score | Confidence | Matched | Missing |\n");
        output.push_str("|---|-------|---------|-------|------------|---------|---------|\n");
        for (index, result) in report.matches.iter().enumerate() {
            let matched: Vec<&str> = result.matched_skills.iter().map(String::as_str).collect();
            let missing: Vec<&str> = result.missing_skills.iter().map(String::as_str).collect();
            output.push_str(&format!(
                "| {} | {} | {} | {:.1}% | {} | {} | {} |\n",
                index + 1,
                escape_cell(&result.job.title),
                escape_cell(&result.job.company),
                result.score,
                Self::markdown_confidence_badge(result.confidence_level),
                escape_cell(&matched.join(", ")),
                escape_cell(&missing.join(", "))
            ));
        }

        output.push_str("\n## Career summary\n\n");
        if let Some(best) = report.best_score() {
            output.push_str(&format!(
                "- **Best score:** {:.1}%\n- **Average score:** {:.1}%\n",
                best,
                report.average_score()
            ));
        }
        if !report.career.top_skill_gaps.is_empty() {
            output.push_str(&format!(
                "- **Most requested missing skills:** {}\n",
                report.career.top_skill_gaps.join(", ")
            ));
        }
        for recommendation in &report.career.recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_profile(&self, report: &ProfileReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_profile(report)
    }

    pub fn generate_matches(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_matches(report)
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

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_matches{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_matches{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_matches{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::insights::{career_summary, profile_insights};
    use crate::processing::matcher::{JobMatcher, JobPosting};
    use crate::processing::skill_matcher::SkillMatcher;
    use crate::processing::vocabulary::Vocabulary;
    use crate::processing::profile::EducationEntry;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_report() -> MatchReport {
        let mut profile = ResumeProfile::with_skills(["Python", "Django", "AWS"]);
        profile.education.push(EducationEntry {
            degree: "BSc Computer Science".to_string(),
            institution: "MIT".to_string(),
            year: "2015-2019".to_string(),
        });
        let jobs = vec![JobPosting {
            company: "Acme".to_string(),
            ..JobPosting::new("Backend Developer", "python, django")
        }];
        let matches = JobMatcher::default().rank_jobs(&profile, &jobs);
        let skill_matcher = SkillMatcher::new(Vocabulary::new()).unwrap();
        let career = career_summary(&profile, &matches, &skill_matcher);
        MatchReport {
            profile,
            search_query: Some("AWS Django".to_string()),
            jobs_considered: 1,
            matches,
            career,
            metadata: ReportMetadata::new("/tmp/cv.pdf", "pdf-extract", 12),
        }
    }

    #[test]
    fn test_console_without_colors() {
        let generator = ReportGenerator::with_options(false, true, true, true);
        let output = generator.generate_matches(&sample_report(), OutputFormat::Console).unwrap();
        assert!(output.contains("Backend Developer 66.7% [GOOD]"));
        assert!(output.contains("✗ AWS"));
        assert!(output.contains("Best 66.7% | Average 66.7%"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_round_trips() {
        let output = ReportGenerator::new()
            .generate_matches(&sample_report(), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["matches"][0]["job"]["company"], "Acme");
        assert_eq!(value["matches"][0]["confidence_level"], "medium");
        assert_eq!(value["profile"]["experience_level"], "unknown");
    }

    #[test]
    fn test_markdown_tables() {
        let output = ReportGenerator::new()
            .generate_matches(&sample_report(), OutputFormat::Markdown)
            .unwrap();
        assert!(output.contains("**Resume:** `cv.pdf`"));
        assert!(output.contains("| BSc Computer Science | MIT | 2015-2019 |"));
        assert!(output.contains("| 1 | Backend Developer | Acme | 66.7% |"));
        assert!(output.contains("- **Best score:** 66.7%"));
        assert!(output.contains("- **Average score:** 66.7%"));
    }

    #[test]
    fn test_profile_report_formats() {
        let report = ProfileReport {
            profile: ResumeProfile::with_skills(["Rust"]),
            skills_by_category: BTreeMap::new(),
            insights: ProfileInsights::default(),
            metadata: ReportMetadata::new("cv.txt", "plain-text", 1),
        };
        let generator = ReportGenerator::with_options(false, false, false, false);
        let console = generator.generate_profile(&report, OutputFormat::Console).unwrap();
        assert!(console.contains("Skills (1): Rust"));
        let markdown = generator.generate_profile(&report, OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("# Resume Profile"));
        assert!(!markdown.contains("**Generated:**"));
    }

    #[test]
    fn test_profile_report_shows_stacks_and_gaps() {
        let profile = ResumeProfile::with_skills(["Python", "Django", "Flask", "PostgreSQL"]);
        let report = ProfileReport {
            insights: profile_insights(&profile),
            profile,
            skills_by_category: BTreeMap::new(),
            metadata: ReportMetadata::new("cv.txt", "plain-text", 1),
        };
        let generator = ReportGenerator::with_options(false, false, true, false);

        let console = generator.generate_profile(&report, OutputFormat::Console).unwrap();
        assert!(console.contains("Python Backend Development"));
        assert!(console.contains("To round out Python Backend Development: FastAPI"));

        let markdown = generator.generate_profile(&report, OutputFormat::Markdown).unwrap();
        assert!(markdown.contains("### Technology stacks"));
        assert!(markdown.contains("**Skill gaps:** FastAPI"));
    }

    #[test]
    fn test_save_and_suggest_filename() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("report.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi");
        assert_eq!(suggest_filename(OutputFormat::Json, "/tmp/jane_cv.pdf", false), "jane_cv_matches.json");
    }
}
