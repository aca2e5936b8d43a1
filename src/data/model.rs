use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value covering the column types found in trip files.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "'{s}'"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v:.4}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Timestamp(t) => write!(f, "{t}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Numeric view of the value; `None` for non-numeric variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

// ---------------------------------------------------------------------------
// RawTable – column-major concatenation of every loaded file
// ---------------------------------------------------------------------------

/// One named column of a [`RawTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<FieldValue>,
}

/// Loaded records before cleaning. Every column holds exactly `len` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    len: usize,
}

impl RawTable {
    /// Empty table with a fixed row count; columns are added with [`push_column`](Self::push_column).
    pub fn with_len(len: usize) -> Self {
        RawTable {
            columns: Vec::new(),
            len,
        }
    }

    /// Append a column, padding or truncating it to the table length.
    pub fn push_column(&mut self, name: impl Into<String>, mut values: Vec<FieldValue>) {
        values.resize(self.len, FieldValue::Null);
        self.columns.push(RawColumn {
            name: name.into(),
            values,
        });
    }

    /// Stack tables vertically. Columns are matched by exact name; cells of
    /// columns a table lacks are filled with nulls.
    pub fn concat(tables: Vec<RawTable>) -> RawTable {
        let mut names: Vec<String> = Vec::new();
        for table in &tables {
            for col in &table.columns {
                if !names.contains(&col.name) {
                    names.push(col.name.clone());
                }
            }
        }

        let len = tables.iter().map(|t| t.len).sum();
        let mut columns: Vec<RawColumn> = names
            .into_iter()
            .map(|name| RawColumn {
                name,
                values: Vec::with_capacity(len),
            })
            .collect();

        for mut table in tables {
            for out in &mut columns {
                match table.columns.iter_mut().find(|c| c.name == out.name) {
                    Some(col) => out.values.append(&mut col.values),
                    None => out
                        .values
                        .extend(std::iter::repeat(FieldValue::Null).take(table.len)),
                }
            }
        }

        RawTable { columns, len }
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub(crate) fn into_columns(self) -> Vec<RawColumn> {
        self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ---------------------------------------------------------------------------
// RateCode – the fixed tariff categories, in display order
// ---------------------------------------------------------------------------

/// Tariff category of a trip. Declaration order is the display order used by
/// both the summary table and the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RateCode {
    Standard,
    Jfk,
    Newark,
    NassauWestchester,
    Negotiated,
    GroupRide,
}

impl RateCode {
    pub const ALL: [RateCode; 6] = [
        RateCode::Standard,
        RateCode::Jfk,
        RateCode::Newark,
        RateCode::NassauWestchester,
        RateCode::Negotiated,
        RateCode::GroupRide,
    ];

    /// Map a raw identifier to a category. Only the integral values 1..=6 are valid.
    pub fn from_id(id: f64) -> Option<RateCode> {
        if !id.is_finite() || id.fract() != 0.0 {
            return None;
        }
        match id as i64 {
            1 => Some(RateCode::Standard),
            2 => Some(RateCode::Jfk),
            3 => Some(RateCode::Newark),
            4 => Some(RateCode::NassauWestchester),
            5 => Some(RateCode::Negotiated),
            6 => Some(RateCode::GroupRide),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            RateCode::Standard => 1,
            RateCode::Jfk => 2,
            RateCode::Newark => 3,
            RateCode::NassauWestchester => 4,
            RateCode::Negotiated => 5,
            RateCode::GroupRide => 6,
        }
    }

    /// Display name of the category.
    pub fn name(self) -> &'static str {
        match self {
            RateCode::Standard => "Standard",
            RateCode::Jfk => "JFK",
            RateCode::Newark => "Newark",
            RateCode::NassauWestchester => "Nassau/Westchester",
            RateCode::Negotiated => "Negotiated",
            RateCode::GroupRide => "Group Ride",
        }
    }

    /// Position in [`RateCode::ALL`].
    pub fn index(self) -> usize {
        usize::from(self.id() - 1)
    }
}

impl fmt::Display for RateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Trip stages
// ---------------------------------------------------------------------------

/// A cleaned trip: typed fields plus the computed duration. Any field may be
/// missing; missing values never pass the validity filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub pickup: Option<NaiveDateTime>,
    pub dropoff: Option<NaiveDateTime>,
    /// Miles.
    pub trip_distance: Option<f64>,
    pub total_amount: Option<f64>,
    pub rate_code_id: Option<f64>,
    pub trip_duration_minutes: Option<f64>,
}

/// A trip that passed every validity constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTrip {
    pub pickup: NaiveDateTime,
    pub dropoff: NaiveDateTime,
    pub trip_distance: f64,
    pub total_amount: f64,
    pub rate_code: RateCode,
    pub trip_duration_minutes: f64,
}

/// A valid trip with its unit-economic ratios. Both ratios are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedTrip {
    pub trip: ValidTrip,
    pub cost_per_minute: f64,
    pub cost_per_mile: f64,
}

impl PricedTrip {
    pub fn rate_code(&self) -> RateCode {
        self.trip.rate_code
    }
}
