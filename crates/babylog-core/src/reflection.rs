use std::sync::Arc;

use crate::error::UpstreamParseError;
use crate::llm::{ChatMessage, ChatRequest, CompletionClient};

const COUNSELLOR_PROMPT: &str =
    "あなたは相手の文章から気持ちや秘めたる意思を汲み取るプロフェッショナルです";

/// Reads a diary entry and suggests what the writer latently wants to do.
#[derive(Clone)]
pub struct Reflector {
    client: Arc<dyn CompletionClient>,
}

impl Reflector {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn build_request(entry: &str) -> ChatRequest {
        let prompt = format!(
            "今日の日記や気持ちを「{entry}」として記しました。\n\
             この内容から、以下の項目を日本語で1～2行で出力してください：\n\
             - 潜在的にやりたいこと、気持ちが向いているもの（Will Can MustのWillにあたるもの）"
        );

        ChatRequest {
            messages: vec![
                ChatMessage::system(COUNSELLOR_PROMPT),
                ChatMessage::user(prompt),
            ],
            max_tokens: Some(300),
            temperature: Some(0.7),
            ..ChatRequest::default()
        }
    }

    pub async fn reflect(&self, entry: &str) -> Result<String, UpstreamParseError> {
        let reply = self.client.complete(Self::build_request(entry)).await?;

        reply
            .content
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(UpstreamParseError::EmptyReply)
    }
}
