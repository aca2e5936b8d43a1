use std::path::PathBuf;

use log::info;

use crate::chart;
use crate::config::AnalysisConfig;
use crate::data::{clean, filter, loader, metrics};
use crate::error::Result;
use crate::summary::{Metric, Summary};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub files: Vec<PathBuf>,
    pub rows_loaded: usize,
    pub rows_filtered_out: usize,
    pub rows_non_finite: usize,
    pub rows_analyzed: usize,
    /// Primary table: cost per minute by rate code.
    pub cost_per_minute: Summary,
    pub cost_per_mile: Summary,
    pub chart_path: PathBuf,
    /// Upper limit of the chart's vertical axis.
    pub chart_y_max: f64,
}

/// Run the whole analysis: load, clean, filter, derive, summarize and chart.
///
/// Progress and the summary tables are printed to standard output. Nothing is
/// written unless every stage before the chart succeeds.
pub fn run(config: &AnalysisConfig) -> Result<RunReport> {
    let files = loader::discover_files(&config.data_dir, &config.extensions)?;
    println!("Loading and combining data from the following files:");
    for path in &files {
        println!(" - {}", path.display());
    }
    let table = loader::load_all(&files)?;
    let rows_loaded = table.len();
    info!("combined {rows_loaded} rows from {} files", files.len());

    println!("\nCleaning and preparing data...");
    let records = clean::clean(table)?;

    let filtered = filter::apply(records);
    println!("Filtered out {} invalid rows.", filtered.removed);

    println!("Calculating unit-economic metrics...");
    let derived = metrics::derive(filtered.retained);
    if derived.dropped_non_finite > 0 {
        println!(
            "Dropped {} rows with non-finite unit metrics.",
            derived.dropped_non_finite
        );
    }
    let trips = derived.trips;

    println!("Analyzing metrics by RateCodeID...");
    let cost_per_minute = Summary::compute(&trips, Metric::CostPerMinute);
    let cost_per_mile = Summary::compute(&trips, Metric::CostPerMile);
    for summary in [&cost_per_minute, &cost_per_mile] {
        println!("\n--- Summary: {} by Rate Code ---", summary.metric.label());
        print!("{summary}");
    }

    println!("\nGenerating visualization...");
    let plot = chart::render_box_plot(
        &trips,
        config.clip_quantile,
        &config.chart_style,
        &config.chart_path,
    )?;
    println!("\nChart saved to {}", config.chart_path.display());

    Ok(RunReport {
        files,
        rows_loaded,
        rows_filtered_out: filtered.removed,
        rows_non_finite: derived.dropped_non_finite,
        rows_analyzed: trips.len(),
        cost_per_minute,
        cost_per_mile,
        chart_path: config.chart_path.clone(),
        chart_y_max: plot.y_max,
    })
}
