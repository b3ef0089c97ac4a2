use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown project: {0}")]
    UnknownProject(String),
    #[error("project name must not be empty")]
    EmptyProjectName,
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
    #[error("unknown question {question_id} in domain {domain_id}")]
    UnknownQuestion {
        domain_id: String,
        question_id: String,
    },
    #[error("invalid score: {value}. min: 0, max: 10")]
    ScoreOutOfRange { value: u8 },
    #[error("invalid percentage: {value}. min: 0, max: 100")]
    PercentageOutOfRange { value: u8 },
    #[error("question {question_id} expects a {expected} response")]
    WrongResponseKind {
        question_id: String,
        expected: &'static str,
    },
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize store")]
    Serialize(#[from] serde_json::Error),
}
