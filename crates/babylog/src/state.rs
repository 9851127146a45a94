use std::sync::Arc;

use babylog_core::llm::CompletionClient;
use babylog_core::{ActivityLogRepository, Normalizer, RecordService, Reflector};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub recorder: RecordService,
    pub reflector: Reflector,
}

impl AppState {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        log: Arc<dyn ActivityLogRepository>,
    ) -> Arc<Self> {
        Arc::new(Self {
            recorder: RecordService::new(Normalizer::new(client.clone()), log),
            reflector: Reflector::new(client),
        })
    }
}
