use serde::Serialize;
use thiserror::Error;

use crate::indicators::Cadence;

/// Process-level failures. Only configuration problems stop a refresh;
/// everything else surfaces from the binary's own I/O.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why a series lookup or a derived metric has no value.
///
/// Absorbed per indicator: a row whose inputs are `Unavailable` is judged
/// `NoData` and the rest of the batch carries on.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Unavailable {
    #[error("series unavailable: {0}")]
    SeriesUnavailable(String),

    #[error("insufficient history: need {needed} observations, have {available}")]
    InsufficientHistory { needed: usize, available: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("observation is missing")]
    MissingValue,

    #[error("{0:?} cadence has no year-over-year offset")]
    UnsupportedCadence(Cadence),
}
