use log::{debug, info};

use super::model::{PricedTrip, ValidTrip};

/// Priced trips plus the number discarded for non-finite ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct DeriveOutcome {
    pub trips: Vec<PricedTrip>,
    pub dropped_non_finite: usize,
}

/// Compute cost per minute and cost per mile for one trip, or `None` when
/// either ratio is not finite.
pub fn price(trip: ValidTrip) -> Option<PricedTrip> {
    let cost_per_minute = trip.total_amount / trip.trip_duration_minutes;
    let cost_per_mile = trip.total_amount / trip.trip_distance;
    if !cost_per_minute.is_finite() || !cost_per_mile.is_finite() {
        return None;
    }
    Some(PricedTrip {
        trip,
        cost_per_minute,
        cost_per_mile,
    })
}

/// Price every trip, dropping those whose ratios are not finite.
pub fn derive(trips: Vec<ValidTrip>) -> DeriveOutcome {
    let initial = trips.len();
    let priced: Vec<PricedTrip> = trips.into_iter().filter_map(price).collect();
    let dropped_non_finite = initial - priced.len();
    if dropped_non_finite > 0 {
        info!("dropped {dropped_non_finite} trips with non-finite unit metrics");
    }
    debug!("priced {} trips", priced.len());
    DeriveOutcome {
        trips: priced,
        dropped_non_finite,
    }
}
