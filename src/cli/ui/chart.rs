use bizbalance_core::{ChartDatum, ChartTone};
use colored::Colorize;

use crate::cli::output::current_preferences;

pub const BAR_WIDTH: usize = 40;

/// Renders one horizontal bar per datum, scaled to the largest magnitude.
///
/// Negative values are drawn with `░` so the sign survives without color.
pub fn render_bars(data: &[ChartDatum], format_value: impl Fn(f64) -> String) -> Vec<String> {
    let peak = data
        .iter()
        .map(|datum| datum.value.abs())
        .fold(0.0_f64, f64::max);
    let label_width = data.iter().map(|d| d.label.len()).max().unwrap_or(0);
    let color = current_preferences().color_enabled;

    data.iter()
        .map(|datum| {
            let length = bar_length(datum.value, peak);
            let glyph = if datum.value < 0.0 { "░" } else { "█" };
            let bar = glyph.repeat(length);
            let bar = if color { paint(bar, datum) } else { bar };
            let padding = " ".repeat(BAR_WIDTH - length);
            format!(
                "  {:<label_width$}  {}{}  {}",
                datum.label,
                bar,
                padding,
                format_value(datum.value),
            )
        })
        .collect()
}

fn bar_length(value: f64, peak: f64) -> usize {
    if peak <= 0.0 || !value.is_finite() {
        return 0;
    }
    let scaled = (value.abs() / peak * BAR_WIDTH as f64).round() as usize;
    scaled.min(BAR_WIDTH)
}

fn paint(bar: String, datum: &ChartDatum) -> String {
    match datum.tone {
        ChartTone::Positive => bar.green().to_string(),
        ChartTone::Negative => bar.red().to_string(),
        ChartTone::Neutral if datum.value < 0.0 => bar.red().to_string(),
        ChartTone::Neutral => bar.blue().to_string(),
    }
}
