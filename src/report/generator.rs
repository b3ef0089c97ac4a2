//! Markdown and JSON report generation.
//!
//! This module renders scorecards into human-readable Markdown reports or
//! machine-readable JSON. Averages are rounded to one decimal here and
//! nowhere else.

use crate::analysis::{classify_score, weakest_domains};
use crate::catalog::{self, Domain};
use crate::config::ReportConfig;
use crate::models::{DomainScoreSummary, Report, ReportMetadata, ScoreLabel, Scorecard};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# Impact Assessment Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    if report.scorecards.is_empty() {
        output.push_str("No answers have been recorded yet.\n\n");
    }

    for card in &report.scorecards {
        output.push_str(&generate_scorecard_section(card, options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Assessments:** {}\n", metadata.assessments));
    section.push_str(&format!("- **Answers:** {}\n", metadata.answers));
    section.push('\n');

    section
}

/// Generate the section for one assessment.
fn generate_scorecard_section(card: &Scorecard, options: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Assessment `{}`\n\n", card.assessment_id));

    if let Some(ref project) = card.project_id {
        section.push_str(&format!("*Project: {}*\n\n", project));
    }

    section.push_str(&format!(
        "**Overall:** {} {:.1} / 10 ({}) | **Completion:** {}% | **Domains started:** {}/{}\n\n",
        card.label.emoji(),
        card.overall_score,
        card.label,
        card.completion_percent,
        card.started_domains(),
        card.domains.len()
    ));

    section.push_str(&generate_domain_table(&card.domains, options));
    section.push_str(&generate_focus_section(&card.domains, options.weakest_domains));

    if options.include_notes && !card.notes.is_empty() {
        section.push_str("### Notes\n\n");
        for note in &card.notes {
            section.push_str(&format!(
                "- **{}**: {}\n",
                question_title(&note.domain_id, &note.question_id),
                note.note
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the per-domain table.
fn generate_domain_table(domains: &[DomainScoreSummary], options: &ReportConfig) -> String {
    let mut table = String::new();

    table.push_str("### Domains\n\n");
    table.push_str("| Domain | Average | Rating | Answered | Completion |\n");
    table.push_str("|:---|:---:|:---|:---:|:---:|\n");

    let mut unstarted = Vec::new();

    for summary in domains {
        if !summary.is_started() {
            unstarted.push(domain_name(&summary.domain_id));
            if !options.include_unstarted {
                continue;
            }
            table.push_str(&format!(
                "| {} | - | Not started | 0/{} | {} |\n",
                domain_name(&summary.domain_id),
                summary.total_count,
                progress_bar(0)
            ));
            continue;
        }

        let label = summary.label();
        table.push_str(&format!(
            "| {} | {:.1} | {} {} | {}/{} | {} |\n",
            domain_name(&summary.domain_id),
            summary.average_score,
            label.emoji(),
            label,
            summary.completed_count,
            summary.total_count,
            progress_bar(summary.completion_percent)
        ));
    }
    table.push('\n');

    if !options.include_unstarted && !unstarted.is_empty() {
        table.push_str(&format!("*Not started: {}*\n\n", unstarted.join(", ")));
    }

    table
}

/// Generate the focus-areas section from the weakest started domains.
fn generate_focus_section(domains: &[DomainScoreSummary], n: usize) -> String {
    if n == 0 {
        return String::new();
    }

    let weakest: Vec<_> = weakest_domains(domains, n)
        .into_iter()
        .filter(|d| classify_score(d.average_score) < ScoreLabel::Good)
        .collect();

    if weakest.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("### Focus Areas\n\n");

    for (i, summary) in weakest.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} averages {:.1} ({}).\n",
            i + 1,
            domain_name(&summary.domain_id),
            summary.average_score,
            summary.label()
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by ImpactScore v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a Markdown listing of the catalog.
pub fn generate_catalog_markdown(domains: &[Domain]) -> String {
    let mut output = String::new();

    output.push_str("# Assessment Catalog\n\n");
    output.push_str(&format!(
        "{} domains, {} questions. Scores run from 0 to 10.\n\n",
        domains.len(),
        catalog::total_questions()
    ));

    for domain in domains {
        output.push_str(&format!(
            "## {} (`{}`)\n\n",
            domain.name, domain.id
        ));

        for question in domain.questions {
            let mut tags = Vec::new();
            if question.kind == catalog::QuestionKind::Percentage {
                tags.push("percentage");
            }
            if question.inverted {
                tags.push("inverted");
            }

            let scale = if question.labels.is_some() {
                format!(
                    " [1 = {}, 10 = {}]",
                    question.label_for(1).unwrap_or("-"),
                    question.label_for(10).unwrap_or("-")
                )
            } else {
                String::new()
            };

            let suffix = if tags.is_empty() {
                String::new()
            } else {
                format!(" *({})*", tags.join(", "))
            };

            output.push_str(&format!(
                "- `{}`: {}{}{}\n",
                question.id, question.prompt, scale, suffix
            ));
        }
        output.push('\n');
    }

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate a JSON listing of the catalog.
pub fn generate_catalog_json(domains: &[Domain]) -> Result<String> {
    serde_json::to_string_pretty(domains).map_err(Into::into)
}

fn domain_name(domain_id: &str) -> String {
    catalog::find_domain(domain_id)
        .map(|d| d.name.to_string())
        .unwrap_or_else(|| domain_id.to_string())
}

fn question_title(domain_id: &str, question_id: &str) -> String {
    match catalog::find_question(domain_id, question_id) {
        Some(question) => format!("{}: {}", domain_name(domain_id), question.prompt),
        None => format!("{} / {}", domain_name(domain_id), question_id),
    }
}

/// Ten-cell text bar for a completion percentage.
fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize + 5) / 10;
    format!("{}{} {}%", "█".repeat(filled), "░".repeat(10 - filled), percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use chrono::Utc;

    fn create_test_report() -> Report {
        let mut noted = Answer::new("a1", "innovation_and_learning", "adaptation", Some(2));
        noted.notes = Some("Programs rarely change mid-year".to_string());

        let answers = vec![
            Answer::new("a1", "leadership_for_impact", "leadership_commitment", Some(6)),
            Answer::new("a1", "leadership_for_impact", "board_oversight", Some(8)),
            Answer::new("a1", "leadership_for_impact", "accountability", Some(10)),
            noted,
        ];

        let mut card = Scorecard::from_answers("a1", &answers);
        card.project_id = Some("green-cities".to_string());

        Report {
            metadata: ReportMetadata {
                source: "impactscore.json".to_string(),
                generated_at: Utc::now(),
                assessments: 1,
                answers: answers.len(),
            },
            scorecards: vec![card],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Impact Assessment Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Assessment `a1`"));
        assert!(markdown.contains("*Project: green-cities*"));
        assert!(markdown.contains("| Leadership for Impact | 8.0 | 🟢 Excellent | 3/6 |"));
        assert!(markdown.contains("Not started"));
        assert!(markdown.contains("### Focus Areas"));
        assert!(markdown.contains("Innovation & Learning averages 2.0 (Needs Improvement)"));
        assert!(markdown.contains("Programs rarely change mid-year"));
    }

    #[test]
    fn test_overall_line() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        // (8.0 + 2.0) / 2
        assert!(markdown.contains("**Overall:** 🟡 5.0 / 10 (Fair)"));
        assert!(markdown.contains("**Domains started:** 2/7"));
    }

    #[test]
    fn test_report_options() {
        let report = create_test_report();
        let options = ReportConfig {
            include_notes: false,
            include_unstarted: false,
            weakest_domains: 0,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("### Notes"));
        assert!(!markdown.contains("### Focus Areas"));
        assert!(!markdown.contains("| - | Not started |"));
        assert!(markdown.contains("*Not started: Purpose & Strategy"));
    }

    #[test]
    fn test_empty_report() {
        let report = Report {
            metadata: ReportMetadata {
                source: "empty.json".to_string(),
                generated_at: Utc::now(),
                assessments: 0,
                answers: 0,
            },
            scorecards: Vec::new(),
        };

        let markdown = generate_markdown_report(&report, &ReportConfig::default());
        assert!(markdown.contains("No answers have been recorded yet."));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "░░░░░░░░░░ 0%");
        assert_eq!(progress_bar(50), "█████░░░░░ 50%");
        assert_eq!(progress_bar(100), "██████████ 100%");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"scorecards\""));
        assert!(json.contains("\"average_score\": 8.0"));
        assert!(json.contains("\"completion_percent\": 50"));
        assert!(json.contains("\"label\": \"fair\""));
    }

    #[test]
    fn test_catalog_outputs() {
        let markdown = generate_catalog_markdown(catalog::domains());
        assert!(markdown.contains("## Leadership for Impact (`leadership_for_impact`)"));
        assert!(markdown.contains("`purpose_alignment`"));
        assert!(markdown.contains("*(percentage)*"));
        assert!(markdown.contains("*(inverted)*"));
        assert!(markdown.contains("[1 = Never, 10 = Continuously]"));
        assert!(markdown.contains("7 domains, 35 questions"));

        let json = generate_catalog_json(catalog::domains()).unwrap();
        assert!(json.contains("\"kind\": \"percentage\""));
        assert!(json.contains("\"inverted\": true"));
    }
}
