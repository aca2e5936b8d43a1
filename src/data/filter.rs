use log::debug;

use super::model::{RateCode, TripRecord, ValidTrip};

/// Trips must last strictly longer than this many minutes.
pub const MIN_DURATION_MINUTES: f64 = 1.0;
/// Trips must last strictly shorter than this many minutes (one day).
pub const MAX_DURATION_MINUTES: f64 = 1440.0;

// ---------------------------------------------------------------------------
// Validity filter
// ---------------------------------------------------------------------------

/// Records that passed the filter, in input order, and how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub retained: Vec<ValidTrip>,
    pub removed: usize,
}

/// Check a single record. A record passes when:
/// * both timestamps are present and the duration lies in (1, 1440) minutes
/// * trip distance > 0
/// * total amount > 0
/// * the rate-code identifier is one of 1..=6
///
/// Missing values never pass.
pub fn validate(record: &TripRecord) -> Option<ValidTrip> {
    let duration = record.trip_duration_minutes?;
    if !(duration > MIN_DURATION_MINUTES && duration < MAX_DURATION_MINUTES) {
        return None;
    }
    let distance = record.trip_distance.filter(|d| *d > 0.0)?;
    let amount = record.total_amount.filter(|a| *a > 0.0)?;
    let rate_code = record.rate_code_id.and_then(RateCode::from_id)?;

    Some(ValidTrip {
        pickup: record.pickup?,
        dropoff: record.dropoff?,
        trip_distance: distance,
        total_amount: amount,
        rate_code,
        trip_duration_minutes: duration,
    })
}

/// Keep the records that pass [`validate`], preserving their relative order.
pub fn apply(records: Vec<TripRecord>) -> FilterOutcome {
    let initial = records.len();
    let retained: Vec<ValidTrip> = records.iter().filter_map(validate).collect();
    let removed = initial - retained.len();
    debug!("validity filter kept {} of {initial} records", retained.len());
    FilterOutcome { retained, removed }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::data::clean::duration_minutes;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(dropoff: NaiveDateTime, distance: f64, amount: f64, rate: f64) -> TripRecord {
        let pickup = at(0, 0, 0);
        TripRecord {
            pickup: Some(pickup),
            dropoff: Some(dropoff),
            trip_distance: Some(distance),
            total_amount: Some(amount),
            rate_code_id: Some(rate),
            trip_duration_minutes: duration_minutes(pickup, dropoff),
        }
    }

    #[test]
    fn ten_minute_standard_trip_is_retained() {
        let trip = validate(&record(at(0, 10, 0), 2.0, 20.0, 1.0)).unwrap();
        assert_eq!(trip.rate_code, RateCode::Standard);
        assert_eq!(trip.trip_duration_minutes, 10.0);
    }

    #[test]
    fn duration_bounds_are_exclusive() {
        assert!(validate(&record(at(0, 0, 30), 2.0, 20.0, 1.0)).is_none());
        assert!(validate(&record(at(0, 1, 0), 2.0, 20.0, 1.0)).is_none());
        assert!(validate(&record(at(0, 1, 1), 2.0, 20.0, 1.0)).is_some());

        let next_day = NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(validate(&record(next_day, 2.0, 20.0, 1.0)).is_none());
        assert!(validate(&record(at(23, 59, 0), 2.0, 20.0, 1.0)).is_some());
    }

    #[test]
    fn negative_duration_is_rejected() {
        let mut r = record(at(0, 10, 0), 2.0, 20.0, 1.0);
        r.trip_duration_minutes = Some(-10.0);
        assert!(validate(&r).is_none());
    }

    #[test]
    fn non_positive_amounts_and_distances_are_rejected() {
        assert!(validate(&record(at(0, 10, 0), 0.0, 20.0, 1.0)).is_none());
        assert!(validate(&record(at(0, 10, 0), -1.0, 20.0, 1.0)).is_none());
        assert!(validate(&record(at(0, 10, 0), 2.0, 0.0, 1.0)).is_none());
        assert!(validate(&record(at(0, 10, 0), 2.0, -5.0, 1.0)).is_none());
    }

    #[test]
    fn unknown_rate_codes_are_rejected() {
        assert!(validate(&record(at(0, 10, 0), 2.0, 20.0, 99.0)).is_none());
        assert!(validate(&record(at(0, 10, 0), 2.0, 20.0, 2.5)).is_none());
        assert!(validate(&record(at(0, 10, 0), 2.0, 20.0, 6.0)).is_some());
    }

    #[test]
    fn missing_values_are_rejected() {
        let mut r = record(at(0, 10, 0), 2.0, 20.0, 1.0);
        r.rate_code_id = None;
        assert!(validate(&r).is_none());

        let mut r = record(at(0, 10, 0), 2.0, 20.0, 1.0);
        r.total_amount = None;
        assert!(validate(&r).is_none());

        let mut r = record(at(0, 10, 0), 2.0, 20.0, 1.0);
        r.trip_duration_minutes = None;
        assert!(validate(&r).is_none());
    }

    #[test]
    fn apply_counts_removed_and_keeps_order() {
        let records = vec![
            record(at(0, 10, 0), 2.0, 20.0, 2.0),
            record(at(0, 0, 30), 2.0, 20.0, 1.0),
            record(at(0, 20, 0), 4.0, 30.0, 1.0),
            record(at(0, 10, 0), 2.0, 20.0, 99.0),
        ];
        let outcome = apply(records);
        assert_eq!(outcome.removed, 2);
        let codes: Vec<_> = outcome.retained.iter().map(|t| t.rate_code).collect();
        assert_eq!(codes, vec![RateCode::Jfk, RateCode::Standard]);
    }
}
