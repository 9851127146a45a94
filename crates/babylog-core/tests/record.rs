mod common;

use std::sync::Arc;

use babylog_core::llm::{LlmError, Role};
use babylog_core::{
    Normalizer, RecordError, RecordService, Reflector, StorageError, UpstreamParseError,
};
use babylog_parser::{Activity, MilkType, ParseError, FUNCTION_NAME, SYSTEM_PROMPT};
use chrono::{DateTime, TimeZone, Utc};
use common::{MemoryLog, ScriptedClient};

fn recorded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap()
}

fn service(client: Arc<ScriptedClient>, log: Arc<MemoryLog>) -> RecordService {
    RecordService::new(Normalizer::new(client), log)
}

#[tokio::test]
async fn breast_milk_utterance_is_recorded() {
    let client = Arc::new(ScriptedClient::function_call(
        FUNCTION_NAME,
        r#"{"activity_type":"feeding","milktype":"母乳","volume":80,"timestamp":"2025-06-02T10:00:00Z"}"#,
    ));
    let log = Arc::new(MemoryLog::default());

    let recorded = service(client.clone(), log.clone())
        .record("母乳を80ミリあげたよ", recorded_at())
        .await
        .expect("record");

    assert_eq!(recorded.id.0, 1);
    assert_eq!(
        recorded.parsed.activity,
        Activity::Feeding {
            milk_type: Some(MilkType::BreastMilk),
            volume_ml: 80,
        }
    );

    let rows = log.rows();
    assert_eq!(rows.len(), 1);
    let fields = rows[0].fields();
    assert_eq!(fields.activity_type.as_str(), "feeding");
    assert_eq!(fields.milk_type, "breast_milk");
    assert_eq!(fields.volume_ml, 80);
    assert_eq!(fields.diaper_type, "");
    assert_eq!(fields.hardness, "");
    assert_eq!(fields.diaper_amount, "");
    assert_eq!(fields.sleep_state, "");
    assert_eq!(fields.timestamp, recorded_at());
}

#[tokio::test]
async fn request_forces_structured_output() {
    let client = Arc::new(ScriptedClient::function_call(
        FUNCTION_NAME,
        r#"{"activity_type":"wake","sleep_state":"wake","timestamp":"2025-06-02T15:45:00Z"}"#,
    ));

    Normalizer::new(client.clone())
        .normalize("起きたよ", recorded_at())
        .await
        .expect("normalize");

    let requests = client.requests.lock().expect("lock");
    let request = &requests[0];
    assert_eq!(request.function_call.as_deref(), Some(FUNCTION_NAME));
    assert_eq!(request.functions.len(), 1);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
    assert!(request.messages[1].content.contains("2025-06-02T10:00:00Z"));
    assert_eq!(request.messages[2].role, Role::User);
    assert_eq!(request.messages[2].content, "起きたよ");
}

#[tokio::test]
async fn free_text_reply_is_rejected_without_writing() {
    let client = Arc::new(ScriptedClient::text(
        r#"{"activity_type":"feeding","milktype":"母乳","volume":80}"#,
    ));
    let log = Arc::new(MemoryLog::default());

    let err = service(client, log.clone())
        .record("母乳を80ミリあげたよ", recorded_at())
        .await
        .expect_err("free text must not be salvaged");

    assert!(matches!(
        err,
        RecordError::UpstreamParse(UpstreamParseError::MissingFunctionCall)
    ));
    assert_eq!(log.attempts(), 0);
    assert!(log.rows().is_empty());
}

#[tokio::test]
async fn wrong_function_name_is_rejected() {
    let client = Arc::new(ScriptedClient::function_call(
        "record_feed",
        r#"{"activity_type":"sleep","timestamp":"2025-06-02T13:00:00Z"}"#,
    ));

    let err = Normalizer::new(client)
        .normalize("寝た", recorded_at())
        .await
        .expect_err("unexpected function");

    assert!(matches!(err, UpstreamParseError::UnexpectedFunction(name) if name == "record_feed"));
}

#[tokio::test]
async fn malformed_arguments_are_upstream_errors() {
    let client = Arc::new(ScriptedClient::function_call(
        FUNCTION_NAME,
        r#"{"activity_type":"feeding","volume":80"#,
    ));
    let log = Arc::new(MemoryLog::default());

    let err = service(client, log.clone())
        .record("ミルク80", recorded_at())
        .await
        .expect_err("malformed");

    assert!(matches!(
        err,
        RecordError::UpstreamParse(UpstreamParseError::InvalidArguments(_))
    ));
    assert_eq!(log.attempts(), 0);
}

#[tokio::test]
async fn unstorable_volume_is_rejected_before_insert() {
    let client = Arc::new(ScriptedClient::function_call(
        FUNCTION_NAME,
        r#"{"activity_type":"feeding","milktype":"母乳","volume":3000000000,"timestamp":"2025-06-02T10:00:00Z"}"#,
    ));
    let log = Arc::new(MemoryLog::default());

    let err = service(client, log.clone())
        .record("母乳を30億ミリ", recorded_at())
        .await
        .expect_err("volume");

    assert!(matches!(
        err,
        RecordError::UpstreamParse(UpstreamParseError::InvalidArguments(
            ParseError::InvalidVolume(_)
        ))
    ));
    assert_eq!(log.attempts(), 0);
}

#[tokio::test]
async fn transport_failures_are_upstream_errors() {
    let client = Arc::new(ScriptedClient::new(|| {
        Err(LlmError::Status {
            status: 503,
            body: "overloaded".into(),
        })
    }));
    let log = Arc::new(MemoryLog::default());

    let err = service(client.clone(), log.clone())
        .record("うんち出た", recorded_at())
        .await
        .expect_err("transport");

    assert!(matches!(
        err,
        RecordError::UpstreamParse(UpstreamParseError::Transport(LlmError::Status { status: 503, .. }))
    ));
    assert_eq!(client.request_count(), 1);
    assert_eq!(log.attempts(), 0);
}

#[tokio::test]
async fn storage_failure_leaves_no_row() {
    let client = Arc::new(ScriptedClient::function_call(
        FUNCTION_NAME,
        r#"{"activity_type":"diaper","diaper_type":"おしっこ","timestamp":"2025-06-02T11:30:00Z"}"#,
    ));
    let log = Arc::new(MemoryLog::failing());

    let err = service(client, log.clone())
        .record("おしっこ出た", recorded_at())
        .await
        .expect_err("storage");

    assert!(matches!(err, RecordError::Storage(StorageError::Database(_))));
    assert_eq!(log.attempts(), 1);
    assert!(log.rows().is_empty());
}

#[tokio::test]
async fn identical_utterances_are_independent() {
    let client = Arc::new(ScriptedClient::function_call(
        FUNCTION_NAME,
        r#"{"activity_type":"sleep","sleep_state":"sleep","timestamp":"2025-06-02T13:00:00Z"}"#,
    ));
    let log = Arc::new(MemoryLog::default());
    let service = service(client.clone(), log.clone());

    let first = service.record("寝た", recorded_at()).await.expect("first");
    let second = service.record("寝た", recorded_at()).await.expect("second");

    assert_ne!(first.id, second.id);
    assert_eq!(client.request_count(), 2);
    assert_eq!(log.rows().len(), 2);
}

#[tokio::test]
async fn reflection_returns_trimmed_reply() {
    let client = Arc::new(ScriptedClient::text("  家族との時間を大切にしたい  \n"));

    let reply = Reflector::new(client.clone())
        .reflect("今日は子どもと公園に行った")
        .await
        .expect("reflect");

    assert_eq!(reply, "家族との時間を大切にしたい");
    let requests = client.requests.lock().expect("lock");
    assert_eq!(requests[0].max_tokens, Some(300));
    assert!(requests[0].messages[1].content.contains("今日は子どもと公園に行った"));
}

#[tokio::test]
async fn empty_reflection_is_an_error() {
    let client = Arc::new(ScriptedClient::text("   "));

    let err = Reflector::new(client)
        .reflect("日記")
        .await
        .expect_err("empty");

    assert!(matches!(err, UpstreamParseError::EmptyReply));
}
