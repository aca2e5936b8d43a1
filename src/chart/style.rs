use image::Rgb;

/// Visual parameters of the distribution chart. Passed explicitly to
/// [`super::render_box_plot`]; nothing is read from process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    /// Fill of the plotting area.
    pub panel: Rgb<u8>,
    /// Horizontal grid lines; `None` disables them.
    pub grid: Option<Rgb<u8>>,
    pub frame: Rgb<u8>,
    /// Box outlines, whiskers, medians and outlier markers.
    pub line: Rgb<u8>,
    pub text: Rgb<u8>,
    /// Box fills use evenly spaced hues at this saturation and lightness.
    pub fill_saturation: f32,
    pub fill_lightness: f32,
    /// Share of each category slot taken by its box.
    pub box_width_ratio: f32,
    /// Whisker reach in multiples of the interquartile range.
    pub whisker_iqr: f64,
    pub outlier_radius: u32,
    /// Pixel size of one glyph dot for the title, axis labels and tick labels.
    pub title_scale: u32,
    pub label_scale: u32,
    pub tick_scale: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartStyle {
    /// White grid look at 1200×800 (a 12×8 inch figure at 100 dpi).
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background: Rgb([255, 255, 255]),
            panel: Rgb([255, 255, 255]),
            grid: Some(Rgb([224, 224, 224])),
            frame: Rgb([204, 204, 204]),
            line: Rgb([63, 63, 63]),
            text: Rgb([38, 38, 38]),
            fill_saturation: 0.55,
            fill_lightness: 0.6,
            box_width_ratio: 0.8,
            whisker_iqr: 1.5,
            outlier_radius: 3,
            title_scale: 3,
            label_scale: 2,
            tick_scale: 2,
            title: "Distribution of Cost per Minute by NYC Taxi Rate Code".to_string(),
            x_label: "Rate Code".to_string(),
            y_label: "Cost per Minute ($)".to_string(),
        }
    }
}
