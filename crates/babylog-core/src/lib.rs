pub mod activity_log;
pub mod db;
pub mod error;
pub mod llm;
pub mod normalizer;
pub mod record;
pub mod reflection;

pub use activity_log::{ActivityLogRepository, LogRowId, PostgresActivityLog};
pub use error::{RecordError, StorageError, UpstreamParseError};
pub use normalizer::Normalizer;
pub use record::{RecordService, RecordedActivity};
pub use reflection::Reflector;
