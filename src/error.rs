//! Error type shared by the chart pipeline.

use thiserror::Error;

/// Errors raised by the pipeline when backend data cannot be trusted.
///
/// Recoverable problems (an unparseable numeric field, a week missing from a
/// sparse series) are absorbed where they occur and never show up here.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("driving book entry {index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("driving book entry {index} has an invalid `{field}`: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("invalid ISO year-week `{0}`")]
    InvalidYearWeek(String),

    #[error("unknown table column `{0}`")]
    UnknownColumn(String),

    #[error("unknown sort order `{0}`, expected `asc` or `desc`")]
    UnknownSortOrder(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
