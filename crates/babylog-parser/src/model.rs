use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Feeding,
    Diaper,
    Sleep,
    Wake,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Feeding => "feeding",
            ActivityType::Diaper => "diaper",
            ActivityType::Sleep => "sleep",
            ActivityType::Wake => "wake",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActivityType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "feeding" | "feed" | "授乳" | "ミルク" => Ok(ActivityType::Feeding),
            "diaper" | "おむつ" | "排せつ" | "排泄" => Ok(ActivityType::Diaper),
            "sleep" | "睡眠" => Ok(ActivityType::Sleep),
            "wake" | "起床" => Ok(ActivityType::Wake),
            other => Err(format!("unknown activity type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilkType {
    Formula,
    BreastMilk,
    Unknown,
}

impl MilkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilkType::Formula => "formula",
            MilkType::BreastMilk => "breast_milk",
            MilkType::Unknown => "unknown",
        }
    }
}

impl TryFrom<&str> for MilkType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "formula" | "milk" | "ミルク" | "粉ミルク" => Ok(MilkType::Formula),
            "breast_milk" | "breast milk" | "breastmilk" | "母乳" => Ok(MilkType::BreastMilk),
            "unknown" | "不明" => Ok(MilkType::Unknown),
            other => Err(format!("unknown milk type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperType {
    Urine,
    Stool,
}

impl DiaperType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiaperType::Urine => "urine",
            DiaperType::Stool => "stool",
        }
    }
}

impl TryFrom<&str> for DiaperType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "urine" | "pee" | "おしっこ" | "尿" => Ok(DiaperType::Urine),
            "stool" | "poop" | "うんち" | "うんこ" | "便" => Ok(DiaperType::Stool),
            other => Err(format!("unknown diaper type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hardness {
    Hard,
    Normal,
    Soft,
}

impl Hardness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hardness::Hard => "hard",
            Hardness::Normal => "normal",
            Hardness::Soft => "soft",
        }
    }
}

impl TryFrom<&str> for Hardness {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "hard" => return Ok(Hardness::Hard),
            "normal" | "普通" | "ふつう" => return Ok(Hardness::Normal),
            "soft" | "loose" => return Ok(Hardness::Soft),
            _ => {}
        }

        // Qualified labels such as "やや固い" or "ゆるめ".
        if value.contains('固') || value.contains('硬') || value.contains("かた") {
            Ok(Hardness::Hard)
        } else if value.contains("やわ") || value.contains('柔') || value.contains("ゆる") {
            Ok(Hardness::Soft)
        } else {
            Err(format!("unknown hardness '{value}'"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperAmount {
    Small,
    Normal,
    Large,
}

impl DiaperAmount {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiaperAmount::Small => "small",
            DiaperAmount::Normal => "normal",
            DiaperAmount::Large => "large",
        }
    }
}

impl TryFrom<&str> for DiaperAmount {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "small" | "少量" | "少なめ" | "少し" => Ok(DiaperAmount::Small),
            "normal" | "普通" | "ふつう" => Ok(DiaperAmount::Normal),
            "large" | "多め" | "多い" | "大量" => Ok(DiaperAmount::Large),
            other => Err(format!("unknown diaper amount '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepState {
    Sleep,
    Wake,
}

impl SleepState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepState::Sleep => "sleep",
            SleepState::Wake => "wake",
        }
    }
}

impl TryFrom<&str> for SleepState {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "sleep" | "asleep" | "寝た" | "睡眠" => Ok(SleepState::Sleep),
            "wake" | "awake" | "起きた" | "起床" => Ok(SleepState::Wake),
            other => Err(format!("unknown sleep state '{other}'")),
        }
    }
}

/// Largest feeding volume that fits the `volume_ml INTEGER` column.
pub const MAX_VOLUME_ML: u32 = i32::MAX as u32;

/// Contents of a diaper change. Hardness and amount only exist for stool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaperContents {
    Urine,
    Stool {
        hardness: Option<Hardness>,
        amount: Option<DiaperAmount>,
    },
}

/// One logged activity. Each variant carries only the fields that are
/// meaningful for its activity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Feeding {
        milk_type: Option<MilkType>,
        volume_ml: u32,
    },
    Diaper {
        contents: Option<DiaperContents>,
    },
    Sleep {
        sleep_state: Option<SleepState>,
    },
    Wake {
        sleep_state: Option<SleepState>,
    },
}

impl Activity {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            Activity::Feeding { .. } => ActivityType::Feeding,
            Activity::Diaper { .. } => ActivityType::Diaper,
            Activity::Sleep { .. } => ActivityType::Sleep,
            Activity::Wake { .. } => ActivityType::Wake,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ActivityFields")]
pub struct NormalizedActivity {
    pub activity: Activity,
    pub timestamp: DateTime<Utc>,
}

impl NormalizedActivity {
    pub fn new(activity: Activity, timestamp: DateTime<Utc>) -> Self {
        Self {
            activity,
            timestamp,
        }
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity.activity_type()
    }

    pub fn fields(&self) -> ActivityFields {
        ActivityFields::from(self.clone())
    }
}

/// Flat column view of a [`NormalizedActivity`]. Out-of-scope fields are
/// always `""` or `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityFields {
    pub activity_type: ActivityType,
    pub milk_type: &'static str,
    pub volume_ml: u32,
    pub diaper_type: &'static str,
    pub hardness: &'static str,
    pub diaper_amount: &'static str,
    pub sleep_state: &'static str,
    pub timestamp: DateTime<Utc>,
}

fn label<T>(value: Option<T>, as_str: fn(&T) -> &'static str) -> &'static str {
    value.as_ref().map(as_str).unwrap_or("")
}

impl From<NormalizedActivity> for ActivityFields {
    fn from(normalized: NormalizedActivity) -> Self {
        let mut fields = ActivityFields {
            activity_type: normalized.activity_type(),
            milk_type: "",
            volume_ml: 0,
            diaper_type: "",
            hardness: "",
            diaper_amount: "",
            sleep_state: "",
            timestamp: normalized.timestamp,
        };

        match normalized.activity {
            Activity::Feeding {
                milk_type,
                volume_ml,
            } => {
                fields.milk_type = label(milk_type, MilkType::as_str);
                fields.volume_ml = volume_ml;
            }
            Activity::Diaper { contents } => match contents {
                Some(DiaperContents::Urine) => {
                    fields.diaper_type = DiaperType::Urine.as_str();
                }
                Some(DiaperContents::Stool { hardness, amount }) => {
                    fields.diaper_type = DiaperType::Stool.as_str();
                    fields.hardness = label(hardness, Hardness::as_str);
                    fields.diaper_amount = label(amount, DiaperAmount::as_str);
                }
                None => {}
            },
            Activity::Sleep { sleep_state } | Activity::Wake { sleep_state } => {
                fields.sleep_state = label(sleep_state, SleepState::as_str);
            }
        }

        fields
    }
}
