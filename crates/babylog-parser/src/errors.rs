use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("function arguments are not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("function arguments must be a JSON object")]
    NotAnObject,

    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("unknown activity type '{0}'")]
    UnknownActivityType(String),

    #[error("volume '{0}' is not a non-negative whole number of millilitres")]
    InvalidVolume(String),
}

/// Recoverable oddities in the upstream payload. The record is still produced,
/// but callers should log these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationWarning {
    UnrecognizedLabel { field: &'static str, value: String },
    TimestampFallback { value: String },
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationWarning::UnrecognizedLabel { field, value } => {
                write!(f, "unrecognized {field} label '{value}'")
            }
            NormalizationWarning::TimestampFallback { value } => {
                write!(f, "could not parse timestamp '{value}', using recorded_at")
            }
        }
    }
}
