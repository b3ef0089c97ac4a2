//! Data models for the impact assessment tool.
//!
//! This module contains the core data structures used throughout
//! the application for representing answers, derived domain summaries,
//! projects, assessments and reports.

use crate::analysis::{
    classify_score, compute_all_summaries, compute_overall_score, overall_completion_percent,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative label derived from a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    /// Below 4
    NeedsImprovement,
    /// 4 up to 6
    Fair,
    /// 6 up to 8
    Good,
    /// 8 and above
    Excellent,
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLabel::NeedsImprovement => write!(f, "Needs Improvement"),
            ScoreLabel::Fair => write!(f, "Fair"),
            ScoreLabel::Good => write!(f, "Good"),
            ScoreLabel::Excellent => write!(f, "Excellent"),
        }
    }
}

impl ScoreLabel {
    /// Returns an emoji representation of the label.
    pub fn emoji(&self) -> &'static str {
        match self {
            ScoreLabel::NeedsImprovement => "🔴",
            ScoreLabel::Fair => "🟡",
            ScoreLabel::Good => "🔵",
            ScoreLabel::Excellent => "🟢",
        }
    }
}

/// A single answer to a catalog question.
///
/// `domain` and `question` are accepted on read for exports written with
/// the older field names; output always uses the canonical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Assessment the answer belongs to.
    pub assessment_id: String,
    /// Catalog domain identifier.
    #[serde(alias = "domain")]
    pub domain_id: String,
    /// Question identifier within the domain.
    #[serde(alias = "question")]
    pub question_id: String,
    /// Stored score 0-10; `None` when only a note was saved.
    #[serde(default)]
    pub score: Option<u8>,
    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Time of the last write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Answer {
    /// Creates an answer without a timestamp.
    pub fn new(
        assessment_id: impl Into<String>,
        domain_id: impl Into<String>,
        question_id: impl Into<String>,
        score: Option<u8>,
    ) -> Self {
        Self {
            assessment_id: assessment_id.into(),
            domain_id: domain_id.into(),
            question_id: question_id.into(),
            score,
            notes: None,
            updated_at: None,
        }
    }

    /// Returns the upsert key of this answer.
    pub fn key(&self) -> AnswerKey {
        AnswerKey {
            assessment_id: self.assessment_id.clone(),
            domain_id: self.domain_id.clone(),
            question_id: self.question_id.clone(),
        }
    }
}

/// Uniqueness key for answers: at most one current answer per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerKey {
    pub assessment_id: String,
    pub domain_id: String,
    pub question_id: String,
}

/// Derived per-domain figures. Recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScoreSummary {
    /// Catalog domain identifier.
    pub domain_id: String,
    /// Mean of answered scores, unrounded; 0 when nothing is answered.
    pub average_score: f64,
    /// Answers with a score.
    pub completed_count: usize,
    /// Questions the catalog defines for the domain.
    pub total_count: usize,
    /// `round(completed_count / total_count * 100)`.
    pub completion_percent: u32,
}

impl DomainScoreSummary {
    /// Whether at least one question of the domain has a score.
    pub fn is_started(&self) -> bool {
        self.completed_count > 0
    }

    /// Label for this domain's average score.
    pub fn label(&self) -> ScoreLabel {
        classify_score(self.average_score)
    }
}

/// A project that owns assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A questionnaire run for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub project_id: String,
    pub created_at: DateTime<Utc>,
}

/// A note attached to an answer, for display in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerNote {
    pub domain_id: String,
    pub question_id: String,
    pub note: String,
}

/// Scores for a single assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scorecard {
    /// Assessment identifier.
    pub assessment_id: String,
    /// Owning project, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Mean of the started domains' averages.
    pub overall_score: f64,
    /// Label of the overall score.
    pub label: ScoreLabel,
    /// Answered questions over all catalog questions.
    pub completion_percent: u32,
    /// One summary per catalog domain, in catalog order.
    pub domains: Vec<DomainScoreSummary>,
    /// Notes left on answers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<AnswerNote>,
}

impl Scorecard {
    /// Creates a scorecard from the answers of one assessment.
    ///
    /// Answers belonging to other assessments are ignored.
    pub fn from_answers(assessment_id: &str, answers: &[Answer]) -> Self {
        let own: Vec<Answer> = answers
            .iter()
            .filter(|a| a.assessment_id == assessment_id)
            .cloned()
            .collect();

        let domains = compute_all_summaries(&own);
        let overall_score = compute_overall_score(&domains);

        let notes = own
            .iter()
            .filter_map(|a| {
                let note = a.notes.as_deref()?.trim();
                if note.is_empty() {
                    return None;
                }
                Some(AnswerNote {
                    domain_id: a.domain_id.clone(),
                    question_id: a.question_id.clone(),
                    note: note.to_string(),
                })
            })
            .collect();

        Self {
            assessment_id: assessment_id.to_string(),
            project_id: None,
            overall_score,
            label: classify_score(overall_score),
            completion_percent: overall_completion_percent(&domains),
            domains,
            notes,
        }
    }

    /// Number of domains with at least one scored answer.
    pub fn started_domains(&self) -> usize {
        self.domains.iter().filter(|d| d.is_started()).count()
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the answers were read from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of assessments in the report.
    pub assessments: usize,
    /// Number of distinct answers read.
    pub answers: usize,
}

/// The complete assessment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// One scorecard per assessment.
    pub scorecards: Vec<Scorecard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_ordering() {
        assert!(ScoreLabel::NeedsImprovement < ScoreLabel::Fair);
        assert!(ScoreLabel::Fair < ScoreLabel::Good);
        assert!(ScoreLabel::Good < ScoreLabel::Excellent);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(ScoreLabel::NeedsImprovement.to_string(), "Needs Improvement");
        assert_eq!(ScoreLabel::Excellent.to_string(), "Excellent");
        assert_eq!(ScoreLabel::Good.emoji(), "🔵");
    }

    #[test]
    fn test_answer_accepts_legacy_field_names() {
        let json = r#"{"assessment_id":"a1","domain":"culture_and_people","question":"wellbeing","score":7}"#;
        let answer: Answer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.domain_id, "culture_and_people");
        assert_eq!(answer.question_id, "wellbeing");
        assert_eq!(answer.score, Some(7));

        let out = serde_json::to_string(&answer).unwrap();
        assert!(out.contains("\"domain_id\""));
        assert!(!out.contains("\"domain\":"));
    }

    #[test]
    fn test_answer_without_score() {
        let json = r#"{"assessment_id":"a1","domain_id":"culture_and_people","question_id":"wellbeing","notes":"later"}"#;
        let answer: Answer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.score, None);
        assert_eq!(answer.notes.as_deref(), Some("later"));
    }

    #[test]
    fn test_scorecard_from_answers() {
        let mut noted = Answer::new("a1", "leadership_for_impact", "accountability", Some(8));
        noted.notes = Some("  reviewed quarterly ".to_string());

        let answers = vec![
            Answer::new("a1", "leadership_for_impact", "leadership_commitment", Some(6)),
            noted,
            Answer::new("a1", "culture_and_people", "wellbeing", Some(4)),
            Answer::new("other", "culture_and_people", "wellbeing", Some(10)),
        ];

        let card = Scorecard::from_answers("a1", &answers);

        assert_eq!(card.domains.len(), 7);
        assert_eq!(card.started_domains(), 2);
        // leadership 7.0, culture 4.0
        assert!((card.overall_score - 5.5).abs() < 1e-9);
        assert_eq!(card.label, ScoreLabel::Fair);
        assert_eq!(card.notes.len(), 1);
        assert_eq!(card.notes[0].note, "reviewed quarterly");
    }
}
