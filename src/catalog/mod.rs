//! The static domain and question catalog.
//!
//! Seven fixed domains, each with an ordered list of questions. The table
//! is read-only and built at compile time; nothing creates or removes
//! domains at runtime.

use crate::analysis::apply_inversion;
use serde::Serialize;

/// Labels for displayed values 1-10 when a question has no custom scale.
pub const DEFAULT_SCALE_LABELS: [&str; 10] = [
    "Not in place",
    "Very limited",
    "Limited",
    "Emerging",
    "Developing",
    "Moderate",
    "Established",
    "Strong",
    "Advanced",
    "Leading",
];

/// Scale used by risk-style questions (displayed high = more risk).
pub const RISK_SCALE_LABELS: [&str; 10] = [
    "Negligible",
    "Very low",
    "Low",
    "Slightly low",
    "Moderate",
    "Noticeable",
    "Elevated",
    "High",
    "Very high",
    "Severe",
];

/// Scale used by frequency-style questions.
pub const FREQUENCY_SCALE_LABELS: [&str; 10] = [
    "Never",
    "Once so far",
    "Ad hoc",
    "Occasionally",
    "Yearly",
    "Twice a year",
    "Quarterly",
    "Monthly",
    "Weekly",
    "Continuously",
];

/// How a question collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Discrete 0-10 button scale.
    Scale,
    /// 0-100% slider, bucketed into a 0-10 score.
    Percentage,
}

/// A single question within a domain.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    /// Identifier, unique within its domain.
    pub id: &'static str,
    /// Prompt shown to the person answering.
    pub prompt: &'static str,
    /// Input control used for the answer.
    pub kind: QuestionKind,
    /// Stored value is `10 - displayed` when set.
    pub inverted: bool,
    /// Custom labels for displayed values 1-10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<&'static [&'static str]>,
}

impl Question {
    const fn scale(id: &'static str, prompt: &'static str) -> Self {
        Self {
            id,
            prompt,
            kind: QuestionKind::Scale,
            inverted: false,
            labels: None,
        }
    }

    const fn percentage(id: &'static str, prompt: &'static str) -> Self {
        Self {
            kind: QuestionKind::Percentage,
            ..Self::scale(id, prompt)
        }
    }

    const fn inverted(self) -> Self {
        Self {
            inverted: true,
            ..self
        }
    }

    const fn with_labels(self, labels: &'static [&'static str]) -> Self {
        Self {
            labels: Some(labels),
            ..self
        }
    }

    /// The label list used for this question's displayed values.
    pub fn scale_labels(&self) -> &'static [&'static str] {
        self.labels.unwrap_or(&DEFAULT_SCALE_LABELS)
    }

    /// Label for a displayed value; 0 has no label.
    pub fn label_for(&self, display_value: u8) -> Option<&'static str> {
        let index = usize::from(display_value).checked_sub(1)?;
        self.scale_labels().get(index).copied()
    }

    /// Convert the value shown on the input control to the stored score.
    pub fn stored_value(&self, display_value: u8) -> u8 {
        apply_inversion(display_value, self.inverted)
    }

    /// Convert a stored score back to the value shown on the input control.
    pub fn display_value(&self, stored_value: u8) -> u8 {
        apply_inversion(stored_value, self.inverted)
    }
}

/// An assessment domain and its questions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Domain {
    pub id: &'static str,
    pub name: &'static str,
    pub questions: &'static [Question],
}

impl Domain {
    /// Look up a question of this domain by id.
    pub fn question(&self, question_id: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

static DOMAINS: [Domain; 7] = [
    Domain {
        id: "purpose_and_strategy",
        name: "Purpose & Strategy",
        questions: &[
            Question::percentage(
                "purpose_alignment",
                "What share of your organization's activities directly advances its stated purpose?",
            ),
            Question::scale(
                "theory_of_change",
                "How clearly is your theory of change articulated and documented?",
            ),
            Question::scale(
                "strategic_priorities",
                "How well do your strategic priorities reflect the impact you intend to create?",
            ),
            Question::scale(
                "mission_drift_risk",
                "How likely is it that commercial pressure pulls activities away from your mission?",
            )
            .inverted()
            .with_labels(&RISK_SCALE_LABELS),
        ],
    },
    Domain {
        id: "leadership_for_impact",
        name: "Leadership for Impact",
        questions: &[
            Question::scale(
                "leadership_commitment",
                "How visibly does senior leadership champion the organization's impact goals?",
            ),
            Question::scale(
                "board_oversight",
                "How regularly does the board review impact performance alongside financials?",
            ),
            Question::scale(
                "impact_in_decisions",
                "How consistently are impact considerations weighed in major decisions?",
            ),
            Question::scale(
                "accountability",
                "How clearly are leaders held accountable for impact targets?",
            ),
            Question::scale(
                "resource_allocation",
                "How well does budget allocation reflect stated impact priorities?",
            ),
            Question::scale(
                "leadership_development",
                "How much does leadership development include impact-oriented skills?",
            ),
        ],
    },
    Domain {
        id: "stakeholder_engagement",
        name: "Stakeholder Engagement",
        questions: &[
            Question::scale(
                "stakeholder_mapping",
                "How completely have you identified the stakeholders affected by your work?",
            ),
            Question::scale(
                "community_voice",
                "How much influence do affected communities have on your programs?",
            ),
            Question::scale(
                "feedback_loops",
                "How systematically do you collect and act on stakeholder feedback?",
            ),
            Question::scale(
                "partnerships",
                "How effective are your partnerships at extending your impact?",
            ),
            Question::scale(
                "transparency",
                "How openly do you share results, including failures, with stakeholders?",
            ),
        ],
    },
    Domain {
        id: "impact_measurement",
        name: "Impact Measurement & Management",
        questions: &[
            Question::scale(
                "indicators_defined",
                "How well defined are the indicators you use to track impact?",
            ),
            Question::scale(
                "baseline_data",
                "How reliable is the baseline data you compare outcomes against?",
            ),
            Question::scale(
                "data_collection",
                "How robust are your processes for collecting impact data?",
            ),
            Question::scale(
                "attribution",
                "How confidently can you attribute observed outcomes to your activities?",
            ),
            Question::scale(
                "reporting_cadence",
                "How often do you report impact results internally?",
            )
            .with_labels(&FREQUENCY_SCALE_LABELS),
            Question::scale(
                "external_verification",
                "How much of your impact reporting is verified by an independent party?",
            ),
            Question::scale(
                "unintended_consequences",
                "How exposed are you to negative outcomes you are not currently tracking?",
            )
            .inverted()
            .with_labels(&RISK_SCALE_LABELS),
            Question::scale(
                "learning_from_data",
                "How often do measurement results lead to changes in programs?",
            ),
        ],
    },
    Domain {
        id: "culture_and_people",
        name: "Culture & People",
        questions: &[
            Question::scale(
                "shared_values",
                "How strongly do staff identify with the organization's purpose?",
            ),
            Question::scale(
                "staff_engagement",
                "How involved are staff in shaping how impact is delivered?",
            ),
            Question::scale(
                "diversity_inclusion",
                "How well does your workforce reflect the communities you serve?",
            ),
            Question::scale(
                "wellbeing",
                "How well does the organization support staff wellbeing?",
            ),
            Question::scale(
                "skills_capacity",
                "How well equipped are teams with the skills needed to deliver impact?",
            ),
        ],
    },
    Domain {
        id: "operations_and_resources",
        name: "Operations & Resources",
        questions: &[
            Question::scale(
                "environmental_footprint",
                "How significant is your operational environmental footprint relative to peers?",
            )
            .inverted()
            .with_labels(&RISK_SCALE_LABELS),
            Question::scale(
                "supply_chain",
                "How thoroughly do you assess suppliers against social and environmental criteria?",
            ),
            Question::scale(
                "financial_sustainability",
                "How sustainable is the funding model behind your impact activities?",
            ),
            Question::scale(
                "governance_processes",
                "How well do internal policies and controls support your impact commitments?",
            ),
        ],
    },
    Domain {
        id: "innovation_and_learning",
        name: "Innovation & Learning",
        questions: &[
            Question::scale(
                "experimentation",
                "How readily does the organization pilot new approaches to its mission?",
            ),
            Question::scale(
                "knowledge_sharing",
                "How effectively are lessons shared across teams and with the sector?",
            ),
            Question::scale(
                "adaptation",
                "How quickly do you adapt programs when evidence shows they underperform?",
            ),
        ],
    },
];

/// All domains, in display order.
pub fn domains() -> &'static [Domain] {
    &DOMAINS
}

/// Look up a domain by id.
pub fn find_domain(domain_id: &str) -> Option<&'static Domain> {
    DOMAINS.iter().find(|d| d.id == domain_id)
}

/// Look up a question by domain and question id.
pub fn find_question(domain_id: &str, question_id: &str) -> Option<&'static Question> {
    find_domain(domain_id).and_then(|d| d.question(question_id))
}

/// Number of questions defined for a domain.
pub fn question_count(domain_id: &str) -> Option<usize> {
    find_domain(domain_id).map(|d| d.questions.len())
}

/// Number of questions across the whole catalog.
pub fn total_questions() -> usize {
    DOMAINS.iter().map(|d| d.questions.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(domains().len(), 7);
        for domain in domains() {
            assert!(
                (1..=8).contains(&domain.questions.len()),
                "{} has {} questions",
                domain.id,
                domain.questions.len()
            );
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let domain_ids: HashSet<_> = domains().iter().map(|d| d.id).collect();
        assert_eq!(domain_ids.len(), domains().len());

        for domain in domains() {
            let question_ids: HashSet<_> = domain.questions.iter().map(|q| q.id).collect();
            assert_eq!(question_ids.len(), domain.questions.len(), "{}", domain.id);
        }
    }

    #[test]
    fn test_leadership_has_six_questions() {
        assert_eq!(question_count("leadership_for_impact"), Some(6));
        assert_eq!(question_count("unknown"), None);
    }

    #[test]
    fn test_single_percentage_question() {
        let percentage: Vec<_> = domains()
            .iter()
            .flat_map(|d| d.questions.iter())
            .filter(|q| q.kind == QuestionKind::Percentage)
            .collect();

        assert_eq!(percentage.len(), 1);
        assert_eq!(percentage[0].id, "purpose_alignment");
    }

    #[test]
    fn test_find_question() {
        let q = find_question("purpose_and_strategy", "mission_drift_risk").unwrap();
        assert!(q.inverted);
        assert!(find_question("purpose_and_strategy", "board_oversight").is_none());
        assert!(find_question("nope", "board_oversight").is_none());
    }

    #[test]
    fn test_label_lookup() {
        let plain = find_question("leadership_for_impact", "accountability").unwrap();
        assert_eq!(plain.label_for(0), None);
        assert_eq!(plain.label_for(1), Some("Not in place"));
        assert_eq!(plain.label_for(10), Some("Leading"));
        assert_eq!(plain.label_for(11), None);

        let custom = find_question("impact_measurement", "reporting_cadence").unwrap();
        assert_eq!(custom.label_for(7), Some("Quarterly"));
    }

    #[test]
    fn test_inverted_question_values() {
        let risk = find_question("operations_and_resources", "environmental_footprint").unwrap();
        assert_eq!(risk.stored_value(2), 8);
        assert_eq!(risk.display_value(8), 2);

        let plain = find_question("culture_and_people", "wellbeing").unwrap();
        assert_eq!(plain.stored_value(2), 2);
    }

    #[test]
    fn test_total_questions() {
        assert_eq!(total_questions(), 4 + 6 + 5 + 8 + 5 + 4 + 3);
    }
}
