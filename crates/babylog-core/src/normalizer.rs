use std::sync::Arc;

use babylog_parser::{
    function_definition, parse_arguments, NormalizedActivity, FUNCTION_NAME, SYSTEM_PROMPT,
};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::error::UpstreamParseError;
use crate::llm::{ChatMessage, ChatRequest, CompletionClient};

/// Converts free-text utterances into [`NormalizedActivity`] records by way of
/// a forced function call on the language model.
#[derive(Clone)]
pub struct Normalizer {
    client: Arc<dyn CompletionClient>,
}

impl Normalizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn build_request(utterance: &str, recorded_at: DateTime<Utc>) -> ChatRequest {
        let recorded_at = recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        ChatRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::system(format!(
                    "記録時刻 (recorded_at): {recorded_at}\ntimestamp にはこの値をそのまま入れてください。"
                )),
                ChatMessage::user(utterance),
            ],
            functions: vec![function_definition()],
            function_call: Some(FUNCTION_NAME.to_string()),
            ..ChatRequest::default()
        }
    }

    pub async fn normalize(
        &self,
        utterance: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<NormalizedActivity, UpstreamParseError> {
        let reply = self
            .client
            .complete(Self::build_request(utterance, recorded_at))
            .await?;

        let call = reply
            .function_call
            .ok_or(UpstreamParseError::MissingFunctionCall)?;
        if call.name != FUNCTION_NAME {
            return Err(UpstreamParseError::UnexpectedFunction(call.name));
        }

        let normalized = parse_arguments(&call.arguments, recorded_at)?;
        for warning in &normalized.warnings {
            warn!(%warning, "normalization degraded upstream field");
        }

        debug!(
            activity_type = %normalized.activity.activity_type(),
            timestamp = %normalized.activity.timestamp,
            "utterance normalized"
        );
        Ok(normalized.activity)
    }
}
