use std::path::{Path, PathBuf};

use crate::chart::ChartStyle;

/// Directory scanned for input files when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Chart location, relative to the working directory.
pub const DEFAULT_CHART_PATH: &str = "cost_per_minute_by_rate_code.png";
/// Upper bound of the chart's vertical axis, as a quantile of cost per minute.
pub const DEFAULT_CLIP_QUANTILE: f64 = 0.95;

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Everything a run needs, passed explicitly into [`crate::pipeline::run`].
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    /// Lower-case file extensions (without the dot) picked up by discovery.
    pub extensions: Vec<String>,
    pub chart_path: PathBuf,
    pub clip_quantile: f64,
    pub chart_style: ChartStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            extensions: vec!["parquet".to_string()],
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            clip_quantile: DEFAULT_CLIP_QUANTILE,
            chart_style: ChartStyle::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_chart_path(mut self, path: impl AsRef<Path>) -> Self {
        self.chart_path = path.as_ref().to_path_buf();
        self
    }

    /// Replace the recognized extensions; leading dots and case are ignored.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_chart_style(mut self, style: ChartStyle) -> Self {
        self.chart_style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_locations() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.extensions, vec!["parquet"]);
        assert_eq!(
            cfg.chart_path,
            PathBuf::from("cost_per_minute_by_rate_code.png")
        );
        assert_eq!(cfg.clip_quantile, 0.95);
    }

    #[test]
    fn extensions_are_normalized() {
        let cfg = AnalysisConfig::default().with_extensions([".CSV", "json"]);
        assert_eq!(cfg.extensions, vec!["csv", "json"]);
    }

    #[test]
    fn chart_style_can_be_replaced() {
        let style = ChartStyle {
            width: 640,
            height: 480,
            grid: None,
            ..ChartStyle::default()
        };
        let cfg = AnalysisConfig::default().with_chart_style(style);
        assert_eq!((cfg.chart_style.width, cfg.chart_style.height), (640, 480));
        assert!(cfg.chart_style.grid.is_none());
    }
}
