use babylog_parser::ParseError;
use thiserror::Error;

use crate::llm::LlmError;

/// The language model could not be reached, or did not return the structured
/// payload that was asked for.
#[derive(Error, Debug)]
pub enum UpstreamParseError {
    #[error("language model request failed: {0}")]
    Transport(#[from] LlmError),

    #[error("language model replied without a function call")]
    MissingFunctionCall,

    #[error("language model called unexpected function '{0}'")]
    UnexpectedFunction(String),

    #[error("invalid function arguments: {0}")]
    InvalidArguments(#[from] ParseError),

    #[error("language model returned an empty reply")]
    EmptyReply,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failure of the normalize-then-persist pipeline. The variant tells the
/// caller whether the input was not understood or could not be saved.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    UpstreamParse(#[from] UpstreamParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
