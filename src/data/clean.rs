use chrono::{DateTime, NaiveDateTime};
use log::debug;

use super::model::{FieldValue, RawColumn, RawTable, TripRecord};
use crate::error::{AnalysisError, Result};

/// A field the analysis needs, with the column names accepted for it.
struct RequiredField {
    name: &'static str,
    aliases: &'static [&'static str],
}

const PICKUP: RequiredField = RequiredField {
    name: "tpep_pickup_datetime",
    aliases: &["tpep_pickup_datetime", "lpep_pickup_datetime", "pickup_datetime"],
};
const DROPOFF: RequiredField = RequiredField {
    name: "tpep_dropoff_datetime",
    aliases: &["tpep_dropoff_datetime", "lpep_dropoff_datetime", "dropoff_datetime"],
};
const TRIP_DISTANCE: RequiredField = RequiredField {
    name: "trip_distance",
    aliases: &["trip_distance"],
};
const TOTAL_AMOUNT: RequiredField = RequiredField {
    name: "total_amount",
    aliases: &["total_amount"],
};
const RATE_CODE_ID: RequiredField = RequiredField {
    name: "ratecodeid",
    aliases: &["ratecodeid"],
};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Lower-case every column name. Columns that collapse onto the same name are
/// merged row by row, keeping the first non-null value.
pub fn normalize_columns(table: RawTable) -> RawTable {
    let len = table.len();
    let mut merged: Vec<RawColumn> = Vec::new();

    for col in table.into_columns() {
        let name = col.name.to_lowercase();
        match merged.iter_mut().find(|m| m.name == name) {
            Some(existing) => {
                for (slot, value) in existing.values.iter_mut().zip(col.values) {
                    if slot.is_null() {
                        *slot = value;
                    }
                }
            }
            None => merged.push(RawColumn {
                name,
                values: col.values,
            }),
        }
    }

    let mut out = RawTable::with_len(len);
    for col in merged {
        out.push_column(col.name, col.values);
    }
    out
}

/// Normalize names, type the required fields and compute trip durations.
pub fn clean(table: RawTable) -> Result<Vec<TripRecord>> {
    let table = normalize_columns(table);

    let pickup_col = required_column(&table, &PICKUP)?;
    let dropoff_col = required_column(&table, &DROPOFF)?;
    let distance_col = required_column(&table, &TRIP_DISTANCE)?;
    let amount_col = required_column(&table, &TOTAL_AMOUNT)?;
    let rate_col = required_column(&table, &RATE_CODE_ID)?;

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let pickup = to_timestamp(&pickup_col.values[row], PICKUP.name, row)?;
        let dropoff = to_timestamp(&dropoff_col.values[row], DROPOFF.name, row)?;
        records.push(TripRecord {
            pickup,
            dropoff,
            trip_distance: to_number(&distance_col.values[row], TRIP_DISTANCE.name, row)?,
            total_amount: to_number(&amount_col.values[row], TOTAL_AMOUNT.name, row)?,
            rate_code_id: to_number(&rate_col.values[row], RATE_CODE_ID.name, row)?,
            trip_duration_minutes: pickup
                .zip(dropoff)
                .and_then(|(p, d)| duration_minutes(p, d)),
        });
    }
    debug!("cleaned {} records", records.len());
    Ok(records)
}

/// Elapsed minutes from `pickup` to `dropoff`; negative when the order is reversed.
pub fn duration_minutes(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> Option<f64> {
    let micros = dropoff.signed_duration_since(pickup).num_microseconds()?;
    Some(micros as f64 / 1_000_000.0 / 60.0)
}

fn required_column<'t>(table: &'t RawTable, field: &RequiredField) -> Result<&'t RawColumn> {
    field
        .aliases
        .iter()
        .find_map(|alias| table.column(alias))
        .ok_or_else(|| AnalysisError::Schema {
            field: field.name,
            available: table.column_names().join(", "),
        })
}

/// Parse a timestamp written as text.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|t| t.naive_utc())
        })
}

fn to_timestamp(
    value: &FieldValue,
    field: &'static str,
    row: usize,
) -> Result<Option<NaiveDateTime>> {
    match value {
        FieldValue::Timestamp(t) => Ok(Some(*t)),
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| invalid(value, field, row, "a timestamp")),
        other => Err(invalid(other, field, row, "a timestamp")),
    }
}

fn to_number(value: &FieldValue, field: &'static str, row: usize) -> Result<Option<f64>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(value, field, row, "a number")),
        other => other
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(other, field, row, "a number")),
    }
}

fn invalid(
    value: &FieldValue,
    field: &'static str,
    row: usize,
    expected: &'static str,
) -> AnalysisError {
    AnalysisError::InvalidValue {
        field,
        row,
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn trip_table(dropoff: FieldValue) -> RawTable {
        let mut t = RawTable::with_len(1);
        t.push_column("tpep_pickup_datetime", vec![FieldValue::Timestamp(ts(0, 0, 0))]);
        t.push_column("tpep_dropoff_datetime", vec![dropoff]);
        t.push_column("Trip_Distance", vec![FieldValue::Float(2.0)]);
        t.push_column("total_amount", vec![FieldValue::Integer(20)]);
        t.push_column("RatecodeID", vec![FieldValue::Float(1.0)]);
        t
    }

    #[test]
    fn computes_duration_in_minutes() {
        let records = clean(trip_table(FieldValue::Timestamp(ts(0, 10, 0)))).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.trip_duration_minutes, Some(10.0));
        assert_eq!(r.trip_distance, Some(2.0));
        assert_eq!(r.total_amount, Some(20.0));
        assert_eq!(r.rate_code_id, Some(1.0));
    }

    #[test]
    fn parses_text_timestamps() {
        let dropoff = FieldValue::Text("2023-01-01 00:00:30".into());
        let records = clean(trip_table(dropoff)).unwrap();
        assert_eq!(records[0].trip_duration_minutes, Some(0.5));

        assert_eq!(parse_timestamp("2023-01-01T00:10:00"), Some(ts(0, 10, 0)));
        let fractional = parse_timestamp("2023-01-01 00:10:00.250").unwrap();
        assert_eq!(fractional.nanosecond(), 250_000_000);
        assert_eq!(parse_timestamp("2023-01-01T05:10:00+05:00"), Some(ts(0, 10, 0)));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn null_timestamp_leaves_duration_missing() {
        let records = clean(trip_table(FieldValue::Null)).unwrap();
        assert_eq!(records[0].trip_duration_minutes, None);
    }

    #[test]
    fn unparseable_timestamp_is_an_error() {
        let err = clean(trip_table(FieldValue::Text("soon".into()))).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidValue { field: "tpep_dropoff_datetime", row: 0, .. }
        ));
    }

    #[test]
    fn missing_field_names_the_field() {
        let mut t = RawTable::with_len(0);
        t.push_column("tpep_pickup_datetime", vec![]);
        t.push_column("tpep_dropoff_datetime", vec![]);
        t.push_column("trip_distance", vec![]);
        t.push_column("ratecodeid", vec![]);
        let err = clean(t).unwrap_err();
        match err {
            AnalysisError::Schema { field, .. } => assert_eq!(field, "total_amount"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn green_taxi_aliases_are_accepted() {
        let mut t = RawTable::with_len(1);
        t.push_column("lpep_pickup_datetime", vec![FieldValue::Timestamp(ts(1, 0, 0))]);
        t.push_column("lpep_dropoff_datetime", vec![FieldValue::Timestamp(ts(1, 30, 0))]);
        t.push_column("trip_distance", vec![FieldValue::Float(5.0)]);
        t.push_column("total_amount", vec![FieldValue::Float(30.0)]);
        t.push_column("RatecodeID", vec![FieldValue::Integer(2)]);
        let records = clean(t).unwrap();
        assert_eq!(records[0].trip_duration_minutes, Some(30.0));
    }

    #[test]
    fn case_variants_merge_into_one_column() {
        let mut t = RawTable::with_len(2);
        t.push_column("RatecodeID", vec![FieldValue::Integer(1), FieldValue::Null]);
        t.push_column("ratecodeid", vec![FieldValue::Null, FieldValue::Integer(5)]);
        let t = normalize_columns(t);
        assert_eq!(t.column_names(), vec!["ratecodeid"]);
        assert_eq!(
            t.column("ratecodeid").unwrap().values,
            vec![FieldValue::Integer(1), FieldValue::Integer(5)]
        );
    }
}
