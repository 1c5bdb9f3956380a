use crate::models::{AggregationResult, DailyPoint, Entry, TimePoint};
use std::collections::BTreeMap;

pub const HOURS_PER_DAY: usize = 24;
pub const AREA_CODES: usize = 4;

pub fn aggregate(entries: &[Entry]) -> AggregationResult {
    AggregationResult {
        daily_trend: daily_trend(entries),
        area_frequency: area_frequency(entries),
        time_series: time_series(entries),
        hourly_average: hourly_average(entries),
    }
}

pub fn daily_trend(entries: &[Entry]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<&str, ScoreSum> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.date.as_str()).or_default().add(entry.pain_score);
    }

    days.into_iter()
        .map(|(day, sum)| DailyPoint {
            day: day.to_string(),
            average: sum.mean(),
        })
        .collect()
}

pub fn area_frequency(entries: &[Entry]) -> [u64; AREA_CODES] {
    let mut counts = [0u64; AREA_CODES];
    for entry in entries {
        if let Some(slot) = usize::try_from(entry.area)
            .ok()
            .and_then(|idx| counts.get_mut(idx))
        {
            *slot = slot.saturating_add(1);
        }
    }
    counts
}

pub fn time_series(entries: &[Entry]) -> Vec<TimePoint> {
    entries
        .iter()
        .map(|entry| TimePoint {
            timestamp: entry.timestamp.to_rfc3339(),
            epoch_ms: entry.timestamp.timestamp_millis(),
            pain_score: entry.pain_score,
        })
        .collect()
}

// Empty hours report 0, not NaN.
pub fn hourly_average(entries: &[Entry]) -> [f64; HOURS_PER_DAY] {
    let mut buckets = [ScoreSum::default(); HOURS_PER_DAY];
    for entry in entries {
        if let Some(bucket) = buckets.get_mut(entry.hour as usize) {
            bucket.add(entry.pain_score);
        }
    }
    buckets.map(|bucket| bucket.mean())
}

#[derive(Debug, Clone, Copy, Default)]
struct ScoreSum {
    total: i64,
    count: u64,
}

impl ScoreSum {
    fn add(&mut self, score: i64) {
        self.total = self.total.saturating_add(score);
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}
