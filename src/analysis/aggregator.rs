//! Score aggregation and completion tracking.
//!
//! Pure functions that turn raw answers plus the static catalog into
//! domain summaries, an overall score and a qualitative label. Missing
//! data is a normal state here: nothing in this module returns an error.

use crate::catalog;
use crate::models::{Answer, AnswerKey, DomainScoreSummary, ScoreLabel};
use std::collections::{BTreeMap, HashMap};

/// Lower bound of the "Excellent" band.
pub const EXCELLENT_THRESHOLD: f64 = 8.0;
/// Lower bound of the "Good" band.
pub const GOOD_THRESHOLD: f64 = 6.0;
/// Lower bound of the "Fair" band.
pub const FAIR_THRESHOLD: f64 = 4.0;

/// Highest score a question can hold.
pub const MAX_SCORE: u8 = 10;

/// Summarize one domain from the full, unfiltered answer list.
pub fn compute_domain_summary(domain_id: &str, answers: &[Answer]) -> DomainScoreSummary {
    let scores: Vec<u8> = answers
        .iter()
        .filter(|a| a.domain_id == domain_id)
        .filter_map(|a| a.score)
        .collect();

    let completed_count = scores.len();
    // Unknown domains count as a single question so the ratio stays finite.
    let total_count = catalog::question_count(domain_id).unwrap_or(1);

    let average_score = if completed_count > 0 {
        scores.iter().map(|&s| f64::from(s)).sum::<f64>() / completed_count as f64
    } else {
        0.0
    };

    DomainScoreSummary {
        domain_id: domain_id.to_string(),
        average_score,
        completed_count,
        total_count,
        completion_percent: percent(completed_count, total_count),
    }
}

/// Summaries for every catalog domain, in catalog order.
pub fn compute_all_summaries(answers: &[Answer]) -> Vec<DomainScoreSummary> {
    catalog::domains()
        .iter()
        .map(|d| compute_domain_summary(d.id, answers))
        .collect()
}

/// Mean of the started domains' averages; 0 when none is started.
///
/// Untouched domains are left out so they don't pull the score toward zero.
pub fn compute_overall_score(summaries: &[DomainScoreSummary]) -> f64 {
    let started: Vec<f64> = summaries
        .iter()
        .filter(|s| s.completed_count > 0)
        .map(|s| s.average_score)
        .collect();

    if started.is_empty() {
        return 0.0;
    }

    started.iter().sum::<f64>() / started.len() as f64
}

/// Map a 0-10 score to its qualitative label.
pub fn classify_score(score: f64) -> ScoreLabel {
    if score >= EXCELLENT_THRESHOLD {
        ScoreLabel::Excellent
    } else if score >= GOOD_THRESHOLD {
        ScoreLabel::Good
    } else if score >= FAIR_THRESHOLD {
        ScoreLabel::Fair
    } else {
        ScoreLabel::NeedsImprovement
    }
}

/// Flip a value on the 0-10 scale when `inverted` is set.
///
/// The transform is its own inverse, so the same call converts a displayed
/// value to the stored one and back.
pub fn apply_inversion(value: u8, inverted: bool) -> u8 {
    if inverted {
        MAX_SCORE.saturating_sub(value)
    } else {
        value
    }
}

/// Bucket a 0-100 percentage into a 0-10 score.
///
/// 0% is its own bucket; every following band of ten maps to the next
/// integer (1-10% is 1, 11-20% is 2, ..., 91-100% is 10).
pub fn percentage_to_score(percentage: u8) -> u8 {
    if percentage == 0 {
        return 0;
    }
    percentage.div_ceil(10).min(MAX_SCORE)
}

/// Answered questions over all catalog questions, as a rounded percentage.
pub fn overall_completion_percent(summaries: &[DomainScoreSummary]) -> u32 {
    let completed: usize = summaries.iter().map(|s| s.completed_count).sum();
    let total: usize = summaries.iter().map(|s| s.total_count).sum();

    if total == 0 {
        return 0;
    }
    percent(completed, total)
}

/// The `n` lowest-scoring started domains, lowest first.
pub fn weakest_domains(summaries: &[DomainScoreSummary], n: usize) -> Vec<&DomainScoreSummary> {
    let mut started: Vec<&DomainScoreSummary> =
        summaries.iter().filter(|s| s.is_started()).collect();

    // Stable sort keeps catalog order among ties.
    started.sort_by(|a, b| a.average_score.total_cmp(&b.average_score));
    started.truncate(n);
    started
}

/// Group answers by assessment id.
pub fn group_by_assessment(answers: &[Answer]) -> BTreeMap<String, Vec<Answer>> {
    let mut grouped: BTreeMap<String, Vec<Answer>> = BTreeMap::new();

    for answer in answers {
        grouped
            .entry(answer.assessment_id.clone())
            .or_default()
            .push(answer.clone());
    }

    grouped
}

/// Fold answers so that the last one written for each key wins.
///
/// Order of first appearance is preserved.
pub fn dedupe_answers(answers: Vec<Answer>) -> Vec<Answer> {
    let mut positions: HashMap<AnswerKey, usize> = HashMap::new();
    let mut result: Vec<Answer> = Vec::with_capacity(answers.len());

    for answer in answers {
        match positions.get(&answer.key()) {
            Some(&index) => result[index] = answer,
            None => {
                positions.insert(answer.key(), result.len());
                result.push(answer);
            }
        }
    }

    result
}

fn percent(part: usize, whole: usize) -> u32 {
    (part as f64 / whole as f64 * 100.0).round() as u32
}
