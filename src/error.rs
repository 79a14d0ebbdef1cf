//! Error types for scoring and external collaborators

use crate::Category;
use thiserror::Error;

/// Failure of an external capability (grammar checker or sentiment analyzer)
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("could not parse {output:?} as {expected}")]
    InvalidOutput {
        output: String,
        expected: &'static str,
    },

    #[error("sentiment polarity {0} is outside [-1, 1]")]
    PolarityOutOfRange(f64),

    #[error("request failed: {0}")]
    Request(String),
}

/// Errors surfaced by the rubric engine
#[derive(Error, Debug)]
pub enum ScoringError {
    /// A collaborator failed while a category was being evaluated
    #[error("{category} evaluation failed: {source}")]
    EvaluationFailed {
        category: Category,
        #[source]
        source: CollaboratorError,
    },

    #[error("a sentiment analyzer is required to build the engine")]
    MissingSentimentAnalyzer,

    #[error("invalid rubric: {0}")]
    InvalidRubric(String),
}

impl ScoringError {
    pub fn evaluation(category: Category, source: CollaboratorError) -> Self {
        ScoringError::EvaluationFailed { category, source }
    }
}
