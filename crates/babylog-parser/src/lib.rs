//! Turns structured-output payloads from a language model into strictly typed
//! baby-care activity records.

mod arguments;
pub mod errors;
pub mod model;
pub mod schema;
pub mod timestamp;

pub use arguments::{parse_arguments, Normalized};
pub use errors::{NormalizationWarning, ParseError};
pub use model::{
    Activity, ActivityFields, ActivityType, DiaperAmount, DiaperContents, DiaperType, Hardness,
    MilkType, NormalizedActivity, SleepState, MAX_VOLUME_ML,
};
pub use schema::{function_definition, FUNCTION_NAME, SYSTEM_PROMPT};
pub use timestamp::{parse_timestamp, resolve_timestamp};
