use serde_json::{json, Value};

/// Name of the structured-output function the model is forced to call.
pub const FUNCTION_NAME: &str = "record_activity";

pub const SYSTEM_PROMPT: &str = r#"あなたは赤ちゃんの各種ログを構造化データに変換するアシスタントです。
ユーザーの発話を分類し、必ず関数 record_activity を呼び出して結果を返してください。
説明文や自由記述のテキストは返さないこと。

● フィールド：
{
  "activity_type": "feeding" または "diaper" または "sleep" または "wake",
  "milktype": "ミルク" または "母乳" または "不明",             // feeding のときのみ
  "volume": 整数 (mL),                                         // feeding のときのみ
  "diaper_type": "おしっこ" または "うんち" または "",           // diaper のときのみ
  "hardness": "固い" または "普通" または "やわらかい" または "",  // うんち のときのみ
  "diaper_amount": "少量" または "普通" または "多め" または "",    // うんち のときのみ
  "sleep_state": "sleep" または "wake" または "",              // sleep/wake のときのみ
  "timestamp": ISO 8601 形式の文字列                           // 記録時刻をそのまま使用
}

【例 1: 授乳ログ】
ユーザー発話: "母乳を80ミリあげたよ"
→ {"activity_type":"feeding","milktype":"母乳","volume":80,"diaper_type":"","hardness":"","diaper_amount":"","sleep_state":"","timestamp":"2025-06-02T10:00:00Z"}

【例 2: 排せつログ（おしっこ）】
ユーザー発話: "おしっこだけ出たからおむつ替えた"
→ {"activity_type":"diaper","milktype":"","volume":0,"diaper_type":"おしっこ","hardness":"","diaper_amount":"","sleep_state":"","timestamp":"2025-06-02T11:30:00Z"}

【例 3: 排せつログ（うんち）】
ユーザー発話: "うんちが出て量多めで少し固かった"
→ {"activity_type":"diaper","milktype":"","volume":0,"diaper_type":"うんち","hardness":"固い","diaper_amount":"多め","sleep_state":"","timestamp":"2025-06-02T12:15:00Z"}

【例 4: 睡眠ログ】
ユーザー発話: "寝かしつけて今はぐっすり寝てる"
→ {"activity_type":"sleep","milktype":"","volume":0,"diaper_type":"","hardness":"","diaper_amount":"","sleep_state":"sleep","timestamp":"2025-06-02T13:00:00Z"}

【例 5: 起床ログ】
ユーザー発話: "起きたよ"
→ {"activity_type":"wake","milktype":"","volume":0,"diaper_type":"","hardness":"","diaper_amount":"","sleep_state":"wake","timestamp":"2025-06-02T15:45:00Z"}
"#;

/// JSON-schema function definition sent alongside [`SYSTEM_PROMPT`].
pub fn function_definition() -> Value {
    json!({
        "name": FUNCTION_NAME,
        "description": "赤ちゃんの授乳・排せつ・睡眠ログを記録する",
        "parameters": {
            "type": "object",
            "properties": {
                "activity_type": {
                    "type": "string",
                    "enum": ["feeding", "diaper", "sleep", "wake"],
                    "description": "feeding / diaper / sleep / wake のいずれか"
                },
                "milktype": {
                    "type": "string",
                    "description": "ミルク / 母乳 / 不明（feeding のときのみ）"
                },
                "volume": {
                    "type": "integer",
                    "description": "量 (mL)（feeding のときのみ）"
                },
                "diaper_type": {
                    "type": "string",
                    "description": "おしっこ / うんち（diaper のときのみ）"
                },
                "hardness": {
                    "type": "string",
                    "description": "うんちのときの硬さ (固い/普通/やわらかい)"
                },
                "diaper_amount": {
                    "type": "string",
                    "description": "うんちのときの量 (少量/普通/多め)"
                },
                "sleep_state": {
                    "type": "string",
                    "description": "sleep / wake (睡眠か起床か)"
                },
                "timestamp": {
                    "type": "string",
                    "description": "ISO 8601 形式の時刻"
                }
            },
            "required": ["activity_type", "timestamp"]
        }
    })
}
