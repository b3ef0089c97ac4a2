//! Local answer store.
//!
//! Projects, assessments and answers are kept in a single JSON document.
//! Answers are upserted on (assessment, domain, question), so each question
//! holds at most one current answer. An assessment is created the first
//! time an answer is submitted for a project.

pub mod error;

pub use error::StoreError;

use crate::analysis::{percentage_to_score, MAX_SCORE};
use crate::catalog::{self, QuestionKind};
use crate::models::{Answer, Assessment, Project};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Highest value accepted from a percentage slider.
pub const MAX_PERCENTAGE: u8 = 100;

/// Serialized form of the store.
///
/// Unknown keys are rejected so unrelated JSON files are not mistaken for
/// an empty store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Either a full store document or a bare list of answers.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerExport {
    Records(Vec<Answer>),
    Store(StoreDocument),
}

impl StoreDocument {
    /// Read a store document or an answer export from disk.
    ///
    /// A bare JSON array of answers is accepted and wrapped in an otherwise
    /// empty document.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let export: AnswerExport =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(match export {
            AnswerExport::Records(answers) => Self {
                answers,
                ..Self::default()
            },
            AnswerExport::Store(doc) => doc,
        })
    }

    /// Project owning an assessment, if recorded.
    pub fn project_of(&self, assessment_id: &str) -> Option<&str> {
        self.assessments
            .iter()
            .find(|a| a.id == assessment_id)
            .map(|a| a.project_id.as_str())
    }
}

/// A submitted response as entered on the input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Displayed value 0-10 of a scale question.
    Scale(u8),
    /// Slider position 0-100 of a percentage question.
    Percentage(u8),
}

/// JSON-file backed store.
#[derive(Debug)]
pub struct AnswerStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl AnswerStore {
    /// Open the store at `path`; a missing file yields an empty store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let doc = if path.exists() {
            let doc = StoreDocument::from_file(path)?;
            debug!(
                "Loaded store {} ({} projects, {} answers)",
                path.display(),
                doc.projects.len(),
                doc.answers.len()
            );
            doc
        } else {
            debug!("No store at {}, starting empty", path.display());
            StoreDocument::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Write the store back to its file.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved store to {}", self.path.display());
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying document.
    pub fn document(&self) -> &StoreDocument {
        &self.doc
    }

    /// Look up a project by id.
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.doc.projects.iter().find(|p| p.id == project_id)
    }

    /// Create a project. Its id is derived from the name and made unique.
    pub fn create_project(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<Project, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyProjectName);
        }

        let base = slugify(name);
        let mut id = base.clone();
        let mut n = 2;
        while self.project(&id).is_some() {
            id = format!("{}-{}", base, n);
            n += 1;
        }

        let project = Project {
            id,
            name: name.to_string(),
            description,
            created_at: Utc::now(),
        };

        info!("Created project {}", project.id);
        self.doc.projects.push(project.clone());
        Ok(project)
    }

    /// The current (most recently created) assessment of a project.
    pub fn current_assessment(&self, project_id: &str) -> Option<&Assessment> {
        self.doc
            .assessments
            .iter()
            .filter(|a| a.project_id == project_id)
            .max_by_key(|a| a.created_at)
    }

    /// Return the project's current assessment, creating one if none exists.
    pub fn ensure_assessment(&mut self, project_id: &str) -> Result<Assessment, StoreError> {
        if self.project(project_id).is_none() {
            return Err(StoreError::UnknownProject(project_id.to_string()));
        }

        if let Some(existing) = self.current_assessment(project_id) {
            return Ok(existing.clone());
        }

        let count = self
            .doc
            .assessments
            .iter()
            .filter(|a| a.project_id == project_id)
            .count();

        let assessment = Assessment {
            id: format!("{}-assessment-{}", project_id, count + 1),
            project_id: project_id.to_string(),
            created_at: Utc::now(),
        };

        info!("Created assessment {}", assessment.id);
        self.doc.assessments.push(assessment.clone());
        Ok(assessment)
    }

    /// Validate and record a response for a project's current assessment.
    ///
    /// Scale responses are converted from the displayed value to the stored
    /// one (inverted questions flip); percentage responses are bucketed.
    /// Score and notes are always written together.
    pub fn submit(
        &mut self,
        project_id: &str,
        domain_id: &str,
        question_id: &str,
        response: Response,
        notes: Option<String>,
    ) -> Result<Answer, StoreError> {
        let domain = catalog::find_domain(domain_id)
            .ok_or_else(|| StoreError::UnknownDomain(domain_id.to_string()))?;
        let question = domain
            .question(question_id)
            .ok_or_else(|| StoreError::UnknownQuestion {
                domain_id: domain_id.to_string(),
                question_id: question_id.to_string(),
            })?;

        let stored = match (question.kind, response) {
            (QuestionKind::Scale, Response::Scale(value)) => {
                if value > MAX_SCORE {
                    return Err(StoreError::ScoreOutOfRange { value });
                }
                question.stored_value(value)
            }
            (QuestionKind::Percentage, Response::Percentage(value)) => {
                if value > MAX_PERCENTAGE {
                    return Err(StoreError::PercentageOutOfRange { value });
                }
                question.stored_value(percentage_to_score(value))
            }
            (QuestionKind::Scale, Response::Percentage(_)) => {
                return Err(StoreError::WrongResponseKind {
                    question_id: question_id.to_string(),
                    expected: "scale",
                })
            }
            (QuestionKind::Percentage, Response::Scale(_)) => {
                return Err(StoreError::WrongResponseKind {
                    question_id: question_id.to_string(),
                    expected: "percentage",
                })
            }
        };

        let assessment = self.ensure_assessment(project_id)?;

        let answer = Answer {
            assessment_id: assessment.id,
            domain_id: domain_id.to_string(),
            question_id: question_id.to_string(),
            score: Some(stored),
            notes: notes.filter(|n| !n.trim().is_empty()),
            updated_at: Some(Utc::now()),
        };

        self.upsert(answer.clone());
        Ok(answer)
    }

    /// Insert an answer, replacing any existing one with the same key.
    pub fn upsert(&mut self, answer: Answer) {
        let key = answer.key();
        match self.doc.answers.iter_mut().find(|a| a.key() == key) {
            Some(existing) => {
                debug!(
                    "Replacing answer {}/{} in {}",
                    key.domain_id, key.question_id, key.assessment_id
                );
                *existing = answer;
            }
            None => self.doc.answers.push(answer),
        }
    }
}

/// Lowercase, ASCII alphanumerics separated by single dashes.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "project".to_string()
    } else {
        slug
    }
}
