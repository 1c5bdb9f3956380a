use crate::models::{Entry, RawRecord, Scalar};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub entries: Vec<Entry>,
    pub dropped: usize,
}

pub fn normalize(records: &[RawRecord]) -> Normalized {
    normalize_in(records, &Local)
}

/// `date` + `time` are read as wall-clock time in `tz`; rows that cannot be placed are dropped.
pub fn normalize_in<Tz: TimeZone>(records: &[RawRecord], tz: &Tz) -> Normalized {
    let mut entries: Vec<Entry> = records
        .iter()
        .filter_map(|record| to_entry(record, tz))
        .collect();
    sort_entries(&mut entries);

    Normalized {
        dropped: records.len() - entries.len(),
        entries,
    }
}

pub fn sort_entries(entries: &mut [Entry]) {
    // slice::sort_by_key is stable
    entries.sort_by_key(|entry| entry.timestamp);
}

fn to_entry<Tz: TimeZone>(record: &RawRecord, tz: &Tz) -> Option<Entry> {
    let date = required_text(record.get("date"))?;
    let time = required_text(record.get("time"))?;
    let area = record.get("area").as_integer()?;
    let pain_score = record.get("pain_score").as_integer()?;

    let naive = parse_date_time(&date, &time)?;
    let timestamp = tz.from_local_datetime(&naive).earliest()?.fixed_offset();

    Some(Entry {
        hour: timestamp.hour(),
        date,
        time,
        area,
        pain_score,
        timestamp,
    })
}

fn required_text(value: &Scalar) -> Option<String> {
    value
        .as_text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let day = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())?;
    let clock = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())?;
    Some(day.and_time(clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn record(pairs: &[(&str, Scalar)]) -> RawRecord {
        RawRecord {
            fields: pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    fn row(date: &str, time: &str, area: f64, score: f64) -> RawRecord {
        record(&[
            ("date", Scalar::Text(date.into())),
            ("time", Scalar::Text(time.into())),
            ("area", Scalar::Number(area)),
            ("pain_score", Scalar::Number(score)),
        ])
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let records = vec![
            row("2024-01-01", "09:00", 1.0, 2.0),
            record(&[
                ("date", Scalar::Text("2024-01-01".into())),
                ("time", Scalar::Text("10:00".into())),
                ("area", Scalar::Number(1.0)),
            ]),
            record(&[
                ("date", Scalar::Absent),
                ("time", Scalar::Text("10:00".into())),
                ("area", Scalar::Number(1.0)),
                ("pain_score", Scalar::Number(1.0)),
            ]),
        ];

        let normalized = normalize_in(&records, &Utc);
        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(normalized.dropped, 2);
        assert!(normalized.entries.len() <= records.len());
    }

    #[test]
    fn keeps_every_complete_row() {
        let records = vec![
            row("2024-01-01", "09:00", 0.0, 0.0),
            row("2024-01-02", "23:59:59", 3.0, 4.0),
        ];
        let normalized = normalize_in(&records, &Utc);
        assert_eq!(normalized.entries.len(), records.len());
        assert_eq!(normalized.dropped, 0);
    }

    #[test]
    fn derives_hour_in_given_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let normalized = normalize_in(&[row("2024-03-05", "21:15", 2.0, 3.0)], &tz);
        let entry = &normalized.entries[0];
        assert_eq!(entry.hour, 21);
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-03-05T21:15:00+09:00");
        assert_eq!(entry.date, "2024-03-05");
    }

    #[test]
    fn unparseable_date_time_is_dropped() {
        let records = vec![
            row("yesterday", "09:00", 1.0, 1.0),
            row("2024-02-30", "09:00", 1.0, 1.0),
            row("2024-01-01", "25:00", 1.0, 1.0),
        ];
        let normalized = normalize_in(&records, &Utc);
        assert!(normalized.entries.is_empty());
        assert_eq!(normalized.dropped, 3);
    }

    #[test]
    fn non_integer_codes_are_dropped_but_out_of_range_kept() {
        let records = vec![
            row("2024-01-01", "09:00", 1.5, 2.0),
            record(&[
                ("date", Scalar::Text("2024-01-01".into())),
                ("time", Scalar::Text("09:00".into())),
                ("area", Scalar::Text("back".into())),
                ("pain_score", Scalar::Number(2.0)),
            ]),
            row("2024-01-01", "09:00", 7.0, 9.0),
        ];
        let normalized = normalize_in(&records, &Utc);
        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(normalized.entries[0].area, 7);
        assert_eq!(normalized.entries[0].pain_score, 9);
    }

    #[test]
    fn sort_is_chronological_and_stable() {
        let records = vec![
            row("2024-01-02", "08:00", 0.0, 1.0),
            row("2024-01-01", "12:00", 1.0, 2.0),
            row("2024-01-01", "12:00", 2.0, 3.0),
            row("2024/01/01", "06:00", 3.0, 4.0),
            row("2024-01-01", "12:00:00", 0.0, 0.0),
        ];
        let normalized = normalize_in(&records, &Utc);
        let order: Vec<(i64, i64)> = normalized
            .entries
            .iter()
            .map(|entry| (entry.area, entry.pain_score))
            .collect();
        assert_eq!(order, vec![(3, 4), (1, 2), (2, 3), (0, 0), (0, 1)]);
    }

    #[test]
    fn numeric_time_cells_fall_out_as_unparseable() {
        let records = vec![record(&[
            ("date", Scalar::Text("2024-01-01".into())),
            ("time", Scalar::Number(900.0)),
            ("area", Scalar::Number(1.0)),
            ("pain_score", Scalar::Number(1.0)),
        ])];
        assert_eq!(normalize_in(&records, &Utc).dropped, 1);
    }
}
