use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::info;
use parquet::arrow::ArrowWriter;

const TRIPS: usize = 5_000;
const OUTPUT_DIR: &str = "data";
const OUTPUT_FILE: &str = "yellow_tripdata_sample.parquet";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// Typical fare shape per rate code: (share of trips, base fare, $/mile, mean miles).
const RATE_PROFILES: [(f64, f64, f64, f64); 6] = [
    (0.88, 3.0, 2.5, 2.8),
    (0.05, 70.0, 0.0, 17.0),
    (0.01, 20.0, 3.0, 16.0),
    (0.01, 15.0, 3.5, 20.0),
    (0.04, 60.0, 0.5, 8.0),
    (0.01, 3.0, 2.5, 3.0),
];

fn pick_rate_code(rng: &mut SimpleRng) -> usize {
    let mut u = rng.next_f64();
    for (i, (share, ..)) in RATE_PROFILES.iter().enumerate() {
        if u < *share {
            return i;
        }
        u -= share;
    }
    0
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let month_start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building the sample month start")?
        .and_utc()
        .timestamp_micros();
    let month_micros = 31 * 24 * 3_600 * 1_000_000u64;

    let mut pickups = Vec::with_capacity(TRIPS);
    let mut dropoffs = Vec::with_capacity(TRIPS);
    let mut distances = Vec::with_capacity(TRIPS);
    let mut amounts = Vec::with_capacity(TRIPS);
    let mut rate_codes: Vec<Option<f64>> = Vec::with_capacity(TRIPS);
    let mut vendors = Vec::with_capacity(TRIPS);

    for _ in 0..TRIPS {
        let code = pick_rate_code(&mut rng);
        let (_, base, per_mile, mean_miles) = RATE_PROFILES[code];

        let miles = rng.gauss(mean_miles, mean_miles * 0.4).max(0.1);
        let mph = rng.gauss(12.0, 4.0).clamp(3.0, 45.0);
        let minutes = miles / mph * 60.0 + rng.gauss(3.0, 1.5).max(0.0);
        let fare = base + per_mile * miles + minutes * 0.5 + rng.gauss(4.0, 2.0).max(0.0);

        let pickup = month_start + rng.below(month_micros) as i64;
        pickups.push(pickup);
        dropoffs.push(pickup + (minutes * 60_000_000.0) as i64);
        distances.push((miles * 100.0).round() / 100.0);
        amounts.push((fare * 100.0).round() / 100.0);
        rate_codes.push(Some((code + 1) as f64));
        vendors.push(1 + rng.below(2) as i32);
    }

    // A handful of rows the analysis must reject: zero distance, refunds,
    // instant trips, unknown and missing rate codes.
    let invalid = TRIPS / 50;
    for i in 0..invalid {
        let row = rng.below(TRIPS as u64) as usize;
        match i % 5 {
            0 => distances[row] = 0.0,
            1 => amounts[row] = -amounts[row],
            2 => dropoffs[row] = pickups[row] + 20_000_000,
            3 => rate_codes[row] = Some(99.0),
            _ => rate_codes[row] = None,
        }
    }

    let timestamp = DataType::Timestamp(TimeUnit::Microsecond, None);
    let schema = Arc::new(Schema::new(vec![
        Field::new("VendorID", DataType::Int32, false),
        Field::new("tpep_pickup_datetime", timestamp.clone(), false),
        Field::new("tpep_dropoff_datetime", timestamp, false),
        Field::new("trip_distance", DataType::Float64, false),
        Field::new("RatecodeID", DataType::Float64, true),
        Field::new("total_amount", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from(vendors)),
            Arc::new(TimestampMicrosecondArray::from(pickups)),
            Arc::new(TimestampMicrosecondArray::from(dropoffs)),
            Arc::new(Float64Array::from(distances)),
            Arc::new(Float64Array::from(rate_codes)),
            Arc::new(Float64Array::from(amounts)),
        ],
    )
    .context("building record batch")?;

    std::fs::create_dir_all(OUTPUT_DIR).context("creating output directory")?;
    let output_path = std::path::Path::new(OUTPUT_DIR).join(OUTPUT_FILE);
    let file = std::fs::File::create(&output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    info!("{invalid} rows were made invalid on purpose");
    println!("Wrote {TRIPS} trips to {}", output_path.display());
    Ok(())
}
