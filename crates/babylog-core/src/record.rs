use std::sync::Arc;

use babylog_parser::NormalizedActivity;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity_log::{ActivityLogRepository, LogRowId};
use crate::error::RecordError;
use crate::normalizer::Normalizer;

#[derive(Debug, Clone, Serialize)]
pub struct RecordedActivity {
    pub id: LogRowId,
    pub parsed: NormalizedActivity,
}

/// Normalizes an utterance and appends it to the activity log. Nothing is
/// written unless normalization succeeds.
#[derive(Clone)]
pub struct RecordService {
    normalizer: Normalizer,
    log: Arc<dyn ActivityLogRepository>,
}

impl RecordService {
    pub fn new(normalizer: Normalizer, log: Arc<dyn ActivityLogRepository>) -> Self {
        Self { normalizer, log }
    }

    pub async fn record(
        &self,
        utterance: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<RecordedActivity, RecordError> {
        let parsed = self.normalizer.normalize(utterance, recorded_at).await?;
        let id = self.log.insert(&parsed).await?;
        Ok(RecordedActivity { id, parsed })
    }
}
