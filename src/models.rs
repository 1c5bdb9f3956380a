use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const AREA_LABELS: [&str; 4] = ["no pain", "lower back", "back", "shoulder"];
pub const SEVERITY_LABELS: [&str; 5] = ["none", "mild", "moderate", "severe", "very severe"];

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Absent,
}

impl Scalar {
    pub fn is_absent(&self) -> bool {
        matches!(self, Scalar::Absent)
    }

    /// Integral numbers only; `2.5` or `"two"` yield `None`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Scalar::Number(value) => Some(value.to_string()),
            Scalar::Text(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub fields: BTreeMap<String, Scalar>,
}

impl RawRecord {
    pub fn get(&self, field: &str) -> &Scalar {
        self.fields.get(field).unwrap_or(&Scalar::Absent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub date: String,
    pub time: String,
    pub area: i64,
    pub pain_score: i64,
    pub timestamp: DateTime<FixedOffset>,
    pub hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    pub day: String,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimePoint {
    pub timestamp: String,
    pub epoch_ms: i64,
    pub pain_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregationResult {
    pub daily_trend: Vec<DailyPoint>,
    pub area_frequency: [u64; 4],
    pub time_series: Vec<TimePoint>,
    pub hourly_average: [f64; 24],
}

#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub areas: BTreeMap<u8, &'static str>,
    pub severities: BTreeMap<u8, &'static str>,
}

pub fn area_label(code: i64) -> Option<&'static str> {
    usize::try_from(code).ok().and_then(|idx| AREA_LABELS.get(idx).copied())
}

pub fn severity_label(score: i64) -> Option<&'static str> {
    usize::try_from(score)
        .ok()
        .and_then(|idx| SEVERITY_LABELS.get(idx).copied())
}

pub fn labels() -> LabelsResponse {
    LabelsResponse {
        areas: (0u8..4)
            .filter_map(|code| area_label(code.into()).map(|label| (code, label)))
            .collect(),
        severities: (0u8..5)
            .filter_map(|score| severity_label(score.into()).map(|label| (score, label)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_cover_fixed_codes_only() {
        assert_eq!(area_label(1), Some("lower back"));
        assert_eq!(area_label(4), None);
        assert_eq!(area_label(-1), None);
        assert_eq!(severity_label(4), Some("very severe"));
        assert_eq!(severity_label(5), None);
    }

    #[test]
    fn scalar_integer_rejects_fractions_and_text() {
        assert_eq!(Scalar::Number(3.0).as_integer(), Some(3));
        assert_eq!(Scalar::Number(2.5).as_integer(), None);
        assert_eq!(Scalar::Text("3".into()).as_integer(), None);
        assert_eq!(Scalar::Absent.as_integer(), None);
    }

    #[test]
    fn missing_field_reads_as_absent() {
        let record = RawRecord::default();
        assert!(record.get("date").is_absent());
    }
}
