use std::fmt;

use crate::data::model::{PricedTrip, RateCode};
use crate::stats::DescriptiveStats;

const NAME_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 12;
const HEADERS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// Metric selection
// ---------------------------------------------------------------------------

/// A per-trip ratio that can be summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    CostPerMinute,
    CostPerMile,
}

impl Metric {
    pub fn of(self, trip: &PricedTrip) -> f64 {
        match self {
            Metric::CostPerMinute => trip.cost_per_minute,
            Metric::CostPerMile => trip.cost_per_mile,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::CostPerMinute => "Cost per Minute",
            Metric::CostPerMile => "Cost per Mile",
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped summary
// ---------------------------------------------------------------------------

/// Statistics of one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySummary {
    pub rate_code: RateCode,
    pub stats: DescriptiveStats,
}

/// Per-category statistics of one metric, one row per [`RateCode`] in
/// declaration order. Categories without trips have a zero count and
/// undefined statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub metric: Metric,
    pub rows: Vec<CategorySummary>,
}

impl Summary {
    /// Group `trips` by rate code and describe `metric` within each group.
    pub fn compute(trips: &[PricedTrip], metric: Metric) -> Self {
        let mut groups: Vec<Vec<f64>> = vec![Vec::new(); RateCode::ALL.len()];
        for trip in trips {
            groups[trip.rate_code().index()].push(metric.of(trip));
        }

        let rows = RateCode::ALL
            .iter()
            .zip(&groups)
            .map(|(&rate_code, values)| CategorySummary {
                rate_code,
                stats: DescriptiveStats::from_values(values),
            })
            .collect();
        Summary { metric, rows }
    }

    pub fn get(&self, rate_code: RateCode) -> Option<&DescriptiveStats> {
        self.rows
            .iter()
            .find(|r| r.rate_code == rate_code)
            .map(|r| &r.stats)
    }

    /// Total trips across all categories.
    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|r| r.stats.count).sum()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<NAME_WIDTH$}", "ratecodename")?;
        for h in HEADERS {
            write!(f, "{h:>VALUE_WIDTH$}")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<NAME_WIDTH$}", row.rate_code.name())?;
            write!(f, "{:>VALUE_WIDTH$.1}", row.stats.count as f64)?;
            for value in row.stats.values() {
                match value {
                    Some(v) => write!(f, "{v:>VALUE_WIDTH$.6}")?,
                    None => write!(f, "{:>VALUE_WIDTH$}", "NaN")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
