//! Cell value annotations

use image::Rgb;

use super::axes::Axes;
use super::matrix::ReportMatrix;

pub const DARK_TEXT: Rgb<u8> = Rgb([0, 0, 0]);
pub const LIGHT_TEXT: Rgb<u8> = Rgb([255, 255, 255]);

/// Counts print without decimals, ratios with two
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Light text on dark cells
pub fn annotation_color(value: f64, threshold: f64) -> Rgb<u8> {
    if value > threshold {
        LIGHT_TEXT
    } else {
        DARK_TEXT
    }
}

/// Write every cell's value at its center
pub fn add_values_to_matrix(matrix: &ReportMatrix, ax: &mut Axes) {
    let threshold = 0.5 * matrix.max();
    for (row, col, value) in matrix.cells() {
        ax.text(
            col as f64,
            row as f64,
            format_value(value),
            annotation_color(value, threshold),
        );
    }
}
