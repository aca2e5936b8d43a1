use crate::data::model::{PricedTrip, RateCode};
use crate::stats::{quantile_sorted, sorted_copy};

/// Geometry of one box in data units.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Most extreme observations within the whisker reach.
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Quartiles plus whiskers reaching `whisker_iqr` interquartile ranges
    /// past the box. `None` for an empty sample.
    pub fn from_values(values: &[f64], whisker_iqr: f64) -> Option<Self> {
        let sorted = sorted_copy(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let reach = (q3 - q1) * whisker_iqr;
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let mut inside = sorted
            .iter()
            .copied()
            .filter(|v| *v >= lo_fence && *v <= hi_fence);
        let whisker_low = inside.next().unwrap_or(q1);
        let whisker_high = inside.last().unwrap_or(whisker_low);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(BoxStats {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// One slot on the category axis; `stats` is `None` for an empty category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBox {
    pub rate_code: RateCode,
    pub stats: Option<BoxStats>,
}

/// Everything the rasterizer draws, in data units.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotData {
    pub boxes: Vec<CategoryBox>,
    /// Top of the vertical axis; the bottom is always zero.
    pub y_max: f64,
}

impl BoxPlotData {
    /// Per-category boxes of cost per minute, in [`RateCode::ALL`] order, with
    /// the vertical axis clipped at the `clip_quantile` of all trips.
    pub fn from_trips(trips: &[PricedTrip], clip_quantile: f64, whisker_iqr: f64) -> Self {
        let mut groups: Vec<Vec<f64>> = vec![Vec::new(); RateCode::ALL.len()];
        for trip in trips {
            groups[trip.rate_code().index()].push(trip.cost_per_minute);
        }

        let boxes = RateCode::ALL
            .iter()
            .zip(&groups)
            .map(|(&rate_code, values)| CategoryBox {
                rate_code,
                stats: BoxStats::from_values(values, whisker_iqr),
            })
            .collect();

        let all: Vec<f64> = trips.iter().map(|t| t.cost_per_minute).collect();
        let y_max = quantile_sorted(&sorted_copy(&all), clip_quantile)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(1.0);

        BoxPlotData { boxes, y_max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whiskers_stop_at_the_fences() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = BoxStats::from_values(&values, 1.5).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn single_value_collapses() {
        let b = BoxStats::from_values(&[2.0], 1.5).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (2.0, 2.0, 2.0));
        assert_eq!((b.whisker_low, b.whisker_high), (2.0, 2.0));
        assert!(b.outliers.is_empty());
        assert!(BoxStats::from_values(&[], 1.5).is_none());
    }

    #[test]
    fn empty_input_keeps_every_slot() {
        let data = BoxPlotData::from_trips(&[], 0.95, 1.5);
        assert_eq!(data.boxes.len(), 6);
        assert!(data.boxes.iter().all(|b| b.stats.is_none()));
        assert_eq!(data.y_max, 1.0);
    }
}
