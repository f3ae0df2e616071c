//! Error types for rate retrieval and aggregation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the rate engine.
///
/// Each failure keeps its kind as it travels up: an aggregation failure wraps
/// the original error instead of flattening it into a message.
#[derive(Error, Debug)]
pub enum RateError {
    /// The rate service could not be reached, answered with a non-2xx status,
    /// or returned a body that is not a JSON array.
    #[error("Transport error for {date}: {message}")]
    Transport { date: NaiveDate, message: String },

    /// A payload entry violates the rate record contract.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// One day of a multi-day window failed; no partial aggregate exists.
    #[error("Aggregation failed on {date}: {source}")]
    Aggregation {
        date: NaiveDate,
        #[source]
        source: Box<RateError>,
    },

    /// A boundary date string was not `YYYYMMDD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid request window: {0}")]
    InvalidWindow(String),
}

impl RateError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RateError::MalformedRecord(reason.into())
    }

    /// Returns the error that started the failure, looking through any
    /// aggregation wrappers.
    pub fn root(&self) -> &RateError {
        match self {
            RateError::Aggregation { source, .. } => source.root(),
            other => other,
        }
    }

    /// The date whose fetch failed, when this is an aggregation failure.
    pub fn failed_date(&self) -> Option<NaiveDate> {
        match self {
            RateError::Aggregation { date, .. } => Some(*date),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.root(), RateError::Transport { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.root(), RateError::MalformedRecord(_))
    }
}
