use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::errors::{NormalizationWarning, ParseError};
use crate::model::{
    Activity, ActivityType, DiaperAmount, DiaperContents, DiaperType, Hardness, MilkType,
    NormalizedActivity, SleepState, MAX_VOLUME_ML,
};
use crate::timestamp::resolve_timestamp;

/// Result of interpreting one function-call payload.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub activity: NormalizedActivity,
    pub warnings: Vec<NormalizationWarning>,
}

/// Parses the argument string of a `record_activity` call into a
/// [`NormalizedActivity`].
///
/// Field names follow the prompt (`milktype`, `volume`) but the canonical
/// names (`milk_type`, `volume_ml`) are accepted too. Only the fields that
/// belong to the reported activity type are read; everything else the model
/// sent is discarded.
pub fn parse_arguments(
    arguments: &str,
    recorded_at: DateTime<Utc>,
) -> Result<Normalized, ParseError> {
    let value: Value =
        serde_json::from_str(arguments).map_err(|source| ParseError::InvalidJson { source })?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let mut reader = FieldReader {
        object,
        warnings: Vec::new(),
    };

    let activity_type = match object.get("activity_type") {
        None | Some(Value::Null) => return Err(ParseError::MissingField("activity_type")),
        Some(raw) => {
            let raw = text(raw);
            ActivityType::try_from(raw.as_str())
                .map_err(|_| ParseError::UnknownActivityType(raw))?
        }
    };

    let timestamp = match object.get("timestamp") {
        None => return Err(ParseError::MissingField("timestamp")),
        Some(raw) => {
            let raw = text(raw);
            let (timestamp, fell_back) = resolve_timestamp(Some(raw.as_str()), recorded_at);
            if fell_back {
                reader
                    .warnings
                    .push(NormalizationWarning::TimestampFallback { value: raw });
            }
            timestamp
        }
    };

    let activity = match activity_type {
        ActivityType::Feeding => Activity::Feeding {
            milk_type: reader.milk_type(),
            volume_ml: reader.volume()?,
        },
        ActivityType::Diaper => Activity::Diaper {
            contents: reader.diaper_contents(),
        },
        ActivityType::Sleep => Activity::Sleep {
            sleep_state: reader.label::<SleepState>("sleep_state", &["sleep_state"]),
        },
        ActivityType::Wake => Activity::Wake {
            sleep_state: reader.label::<SleepState>("sleep_state", &["sleep_state"]),
        },
    };

    Ok(Normalized {
        activity: NormalizedActivity::new(activity, timestamp),
        warnings: reader.warnings,
    })
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    warnings: Vec<NormalizationWarning>,
}

impl FieldReader<'_> {
    fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .find_map(|key| self.object.get(*key))
            .filter(|value| !value.is_null())
    }

    /// Reads an optional enum label. Empty strings mean "not given";
    /// unrecognized labels are dropped with a warning.
    fn label<T>(&mut self, field: &'static str, keys: &[&str]) -> Option<T>
    where
        T: for<'s> TryFrom<&'s str>,
    {
        let raw = text(self.get(keys)?);
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = T::try_from(raw.as_str()).ok();
        if parsed.is_none() {
            self.warnings
                .push(NormalizationWarning::UnrecognizedLabel { field, value: raw });
        }
        parsed
    }

    fn milk_type(&mut self) -> Option<MilkType> {
        let keys = ["milktype", "milk_type"];
        let given = self
            .get(&keys)
            .map(|value| !text(value).trim().is_empty())
            .unwrap_or(false);
        let parsed = self.label::<MilkType>("milk_type", &keys);
        // A feeding with an unreadable milk label is still a feeding of
        // unknown milk.
        if given && parsed.is_none() {
            Some(MilkType::Unknown)
        } else {
            parsed
        }
    }

    fn volume(&self) -> Result<u32, ParseError> {
        match self.get(&["volume", "volume_ml"]) {
            None => Ok(0),
            Some(value) => parse_volume(value),
        }
    }

    fn diaper_contents(&mut self) -> Option<DiaperContents> {
        match self.label::<DiaperType>("diaper_type", &["diaper_type"])? {
            DiaperType::Urine => Some(DiaperContents::Urine),
            DiaperType::Stool => Some(DiaperContents::Stool {
                hardness: self.label::<Hardness>("hardness", &["hardness"]),
                amount: self.label::<DiaperAmount>("diaper_amount", &["diaper_amount", "amount"]),
            }),
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_volume(value: &Value) -> Result<u32, ParseError> {
    let invalid = || ParseError::InvalidVolume(text(value));

    let amount = match value {
        Value::Number(number) => number.as_f64().ok_or_else(invalid)?,
        Value::String(s) => {
            let trimmed = s.trim();
            let digits = ["ml", "mL", "ML", "ミリ", "cc"]
                .iter()
                .find_map(|unit| trimmed.strip_suffix(unit))
                .unwrap_or(trimmed)
                .trim();
            if digits.is_empty() {
                return Ok(0);
            }
            digits.parse::<f64>().map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    if !amount.is_finite() || amount < 0.0 || amount.round() > f64::from(MAX_VOLUME_ML) {
        return Err(invalid());
    }

    Ok(amount.round() as u32)
}
