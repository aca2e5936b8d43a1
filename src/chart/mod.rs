//! Visualizer: box-and-whisker chart of cost per minute by rate code,
//! rasterized to a PNG file.

mod boxplot;
mod canvas;
mod glyphs;
mod style;

use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::{debug, info};

pub use boxplot::{BoxPlotData, BoxStats, CategoryBox};
use canvas::Canvas;
use glyphs::{text_width, GLYPH_HEIGHT};
pub use style::ChartStyle;

use crate::color::{generate_palette, mix};
use crate::data::model::PricedTrip;
use crate::error::{AnalysisError, Result};

const MARGIN_LEFT: i64 = 120;
const MARGIN_RIGHT: i64 = 30;
const MARGIN_TOP: i64 = 70;
const MARGIN_BOTTOM: i64 = 120;
const TARGET_TICKS: f64 = 6.0;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Compute the box geometry of `trips`, draw it with `style` and write a PNG to
/// `path`, replacing any existing file.
pub fn render_box_plot(
    trips: &[PricedTrip],
    clip_quantile: f64,
    style: &ChartStyle,
    path: &Path,
) -> Result<BoxPlotData> {
    let data = BoxPlotData::from_trips(trips, clip_quantile, style.whisker_iqr);
    debug!("chart vertical axis clipped at {:.4}", data.y_max);

    let img = rasterize(&data, style);
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| AnalysisError::Chart {
            path: path.to_path_buf(),
            source,
        })?;
    info!("wrote {}x{} chart to {}", img.width(), img.height(), path.display());
    Ok(data)
}

/// Plot rectangle `(left, top, right, bottom)` for an image of the given size.
pub fn plot_area(style: &ChartStyle) -> (i64, i64, i64, i64) {
    (
        MARGIN_LEFT,
        MARGIN_TOP,
        i64::from(style.width) - MARGIN_RIGHT,
        i64::from(style.height) - MARGIN_BOTTOM,
    )
}

/// Draw the chart into an image.
pub fn rasterize(data: &BoxPlotData, style: &ChartStyle) -> RgbImage {
    let mut canvas = Canvas::new(style.width, style.height, style.background);
    let (left, top, right, bottom) = plot_area(style);
    let to_px = |v: f64| -> i64 {
        let frac = v / data.y_max;
        bottom - (frac * (bottom - top) as f64).round() as i64
    };

    canvas.fill_rect(left, top, right, bottom, style.panel);

    let step = tick_step(data.y_max);
    let ticks = tick_values(data.y_max, step);
    if let Some(grid) = style.grid {
        for &t in &ticks {
            canvas.hline(left, right, to_px(t), 1, grid);
        }
    }

    // Boxes are clipped to the plot area; that is what enforces the axis limit.
    canvas.set_clip(left, top, right + 1, bottom + 1);
    let fills = generate_palette(
        data.boxes.len(),
        style.fill_saturation,
        style.fill_lightness,
    );
    let slot = (right - left) as f64 / data.boxes.len().max(1) as f64;
    for (i, (category, fill)) in data.boxes.iter().zip(&fills).enumerate() {
        let Some(stats) = &category.stats else {
            continue;
        };
        let cx = left + (slot * (i as f64 + 0.5)).round() as i64;
        let half = (slot * f64::from(style.box_width_ratio) / 2.0).round() as i64;
        let cap = half / 2;
        let edge = mix(*fill, style.line, 0.6);

        canvas.vline(cx, to_px(stats.whisker_low), to_px(stats.q1), 2, style.line);
        canvas.vline(cx, to_px(stats.q3), to_px(stats.whisker_high), 2, style.line);
        canvas.hline(cx - cap, cx + cap, to_px(stats.whisker_low), 2, style.line);
        canvas.hline(cx - cap, cx + cap, to_px(stats.whisker_high), 2, style.line);

        let (box_top, box_bottom) = (to_px(stats.q3), to_px(stats.q1));
        canvas.fill_rect(cx - half, box_top, cx + half, box_bottom, *fill);
        canvas.rect_outline((cx - half, box_top), (cx + half, box_bottom), 2, edge);
        canvas.hline(cx - half, cx + half, to_px(stats.median), 3, style.line);

        for &o in &stats.outliers {
            canvas.diamond(cx, to_px(o), i64::from(style.outlier_radius), style.line);
        }
    }
    canvas.reset_clip();

    canvas.rect_outline((left, top), (right, bottom), 1, style.frame);

    // Vertical axis ticks and labels.
    let decimals = tick_decimals(step);
    let tick_h = i64::from(GLYPH_HEIGHT * style.tick_scale);
    for &t in &ticks {
        let y = to_px(t);
        let label = format!("{t:.decimals$}");
        let w = i64::from(text_width(&label, style.tick_scale));
        canvas.hline(left - 6, left - 1, y, 1, style.frame);
        canvas.text(left - 10 - w, y - tick_h / 2, &label, style.tick_scale, style.text);
    }

    // Category labels, wrapped onto two lines when wider than their slot.
    for (i, category) in data.boxes.iter().enumerate() {
        let cx = left + (slot * (i as f64 + 0.5)).round() as i64;
        let mut y = bottom + 12;
        for line in wrap_label(category.rate_code.name(), style.tick_scale, slot) {
            let w = i64::from(text_width(line, style.tick_scale));
            canvas.text(cx - w / 2, y, line, style.tick_scale, style.text);
            y += tick_h + 6;
        }
    }

    let title_w = i64::from(text_width(&style.title, style.title_scale));
    canvas.text(
        (i64::from(style.width) - title_w) / 2,
        (MARGIN_TOP - i64::from(GLYPH_HEIGHT * style.title_scale)) / 2,
        &style.title,
        style.title_scale,
        style.text,
    );

    let label_h = i64::from(GLYPH_HEIGHT * style.label_scale);
    let x_label_w = i64::from(text_width(&style.x_label, style.label_scale));
    canvas.text(
        left + (right - left - x_label_w) / 2,
        i64::from(style.height) - label_h - 20,
        &style.x_label,
        style.label_scale,
        style.text,
    );

    let y_label_h = i64::from(text_width(&style.y_label, style.label_scale));
    canvas.text_vertical(
        20,
        top + (bottom - top - y_label_h) / 2,
        &style.y_label,
        style.label_scale,
        style.text,
    );

    canvas.into_image()
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// A 1, 2, 2.5 or 5 × 10ⁿ step giving roughly six ticks up to `max`.
pub fn tick_step(max: f64) -> f64 {
    if !(max.is_finite() && max > 0.0) {
        return 1.0;
    }
    let raw = max / TARGET_TICKS;
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let factor = [1.0, 2.0, 2.5, 5.0]
        .into_iter()
        .find(|f| *f >= norm)
        .unwrap_or(10.0);
    factor * magnitude
}

/// Multiples of `step` from zero up to `max`.
pub fn tick_values(max: f64, step: f64) -> Vec<f64> {
    let n = (max / step + 1e-9).floor() as usize;
    (0..=n).map(|i| i as f64 * step).collect()
}

/// Fewest decimals that print `step` exactly.
fn tick_decimals(step: f64) -> usize {
    (0..6)
        .find(|d| {
            let scaled = step * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6)
}

/// Split `label` after a '/' or at a space when it does not fit `max_width` pixels.
fn wrap_label(label: &str, scale: u32, max_width: f64) -> Vec<&str> {
    if f64::from(text_width(label, scale)) <= max_width {
        return vec![label];
    }
    match label.find(|c: char| c == '/' || c == ' ') {
        Some(i) if label[i..].starts_with('/') => vec![&label[..=i], &label[i + 1..]],
        Some(i) => vec![&label[..i], &label[i + 1..]],
        None => vec![label],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RateCode;

    #[test]
    fn tick_steps_are_round() {
        assert_eq!(tick_step(6.0), 1.0);
        assert!((tick_step(3.0) - 0.5).abs() < 1e-12);
        assert_eq!(tick_step(14.0), 2.5);
        assert_eq!(tick_step(0.0), 1.0);
        assert_eq!(tick_values(3.2, 1.0), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(tick_decimals(2.5), 1);
        assert_eq!(tick_decimals(0.25), 2);
        assert_eq!(tick_decimals(5.0), 0);
    }

    #[test]
    fn long_labels_wrap() {
        assert_eq!(wrap_label("Standard", 2, 170.0), vec!["Standard"]);
        assert_eq!(
            wrap_label("Nassau/Westchester", 2, 170.0),
            vec!["Nassau/", "Westchester"]
        );
        assert_eq!(wrap_label("Group Ride", 2, 50.0), vec!["Group", "Ride"]);
    }

    #[test]
    fn rasterized_box_uses_category_fill() {
        let style = ChartStyle::default();
        let data = BoxPlotData {
            boxes: RateCode::ALL
                .iter()
                .map(|&rate_code| CategoryBox {
                    rate_code,
                    stats: (rate_code == RateCode::Standard).then(|| BoxStats {
                        q1: 1.0,
                        median: 2.0,
                        q3: 3.0,
                        whisker_low: 0.5,
                        whisker_high: 3.5,
                        outliers: vec![],
                    }),
                })
                .collect(),
            y_max: 4.0,
        };
        let img = rasterize(&data, &style);
        assert_eq!((img.width(), img.height()), (1200, 800));

        let (left, top, right, bottom) = plot_area(&style);
        let slot = (right - left) as f64 / 6.0;
        let fill = generate_palette(6, style.fill_saturation, style.fill_lightness)[0];

        // Between q1 (value 1.0) and the median (value 2.0) of the first slot.
        let cx = left + (slot / 2.0) as i64 + 10;
        let y = bottom - ((1.5 / 4.0) * (bottom - top) as f64) as i64;
        assert_eq!(*img.get_pixel(cx as u32, y as u32), fill);

        // The empty second slot shows only the panel at the same height.
        let cx2 = left + (slot * 1.5) as i64 + 10;
        assert_ne!(*img.get_pixel(cx2 as u32, y as u32), fill);
    }

    #[test]
    fn render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let data = render_box_plot(&[], 0.95, &ChartStyle::default(), &path).unwrap();
        assert_eq!(data.y_max, 1.0);
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (1200, 800));
    }
}
