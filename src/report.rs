//! Classification report heatmaps
//!
//! A report turns labels and predictions into a class-by-metric matrix and
//! draws it as an annotated heatmap. Two reports can be compared either as a
//! difference heatmap or as a split-cell overlay.
//!
//! The color scale is fixed to 0..1 for every cell, so the support column
//! (a count) saturates at the darkest color.

use std::fmt::Display;
use std::ops::{Add, Sub};
use std::path::Path;

use image::RgbImage;
use tracing::debug;

use crate::error::Result;
use crate::metrics::{ReportOptions, classification_report_dict};
use crate::plot::annotate::{add_values_to_matrix, annotation_color, format_value};
use crate::plot::{Axes, Colormap, Renderer, ReportMatrix};

pub const REPORT_TITLE: &str = "Classification report";
pub const DIFFERENCE_TITLE: &str = "Classification report (difference)";
pub const COMPARE_TITLE: &str = "Classification report (compare)";
pub const METRIC_AXIS_LABEL: &str = "Metric";
pub const CLASS_AXIS_LABEL: &str = "Class";

/// Upper bound of the heatmap color scale
const SCALE_MAX: f64 = 1.0;
/// Offset of each overlay value from the cell center, in cell units
const OVERLAY_TEXT_OFFSET: f64 = 0.25;

/// Matrix plus the labels for both axes
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub matrix: ReportMatrix,
    pub keys: Vec<String>,
    pub target_names: Vec<String>,
}

/// Compute the class-by-metric matrix for a set of predictions.
///
/// Only per-class rows are kept. Averages and the accuracy scalar are dropped
/// whatever the classes are named; classes keep the metrics computation's order.
pub fn compute_report_matrix<L: Ord + Clone + Display>(
    y_true: &[L],
    y_pred: &[L],
    options: &ReportOptions,
) -> Result<ReportData> {
    let report = classification_report_dict(y_true, y_pred, options)?;

    let class_rows: Vec<Vec<(&'static str, f64)>> = report
        .classes()
        .map(|(_, scores)| scores.metrics())
        .collect();
    let n_classes = class_rows.len();

    let target_names = options
        .target_names
        .clone()
        .unwrap_or_else(|| (0..n_classes).map(|i| i.to_string()).collect());

    let keys: Vec<String> = class_rows
        .first()
        .map(|row| row.iter().map(|(key, _)| key.to_string()).collect())
        .unwrap_or_default();

    let rows = class_rows
        .into_iter()
        .map(|row| row.into_iter().map(|(_, value)| value).collect())
        .collect();
    let matrix = ReportMatrix::from_rows(rows)?;
    debug!(
        "Report matrix {}x{} for {} samples",
        matrix.rows(),
        matrix.cols(),
        y_true.len()
    );

    Ok(ReportData {
        matrix,
        keys,
        target_names,
    })
}

/// Draw a single report heatmap with value annotations
pub fn plot_report<K: AsRef<str>, N: AsRef<str>>(
    matrix: &ReportMatrix,
    keys: &[K],
    target_names: &[N],
    ax: &mut Axes,
) {
    add_values_to_matrix(matrix, ax);
    ax.imshow(matrix, Colormap::default(), 0.0, SCALE_MAX);
    ax.set_xticklabels(keys);
    ax.set_yticklabels(target_names);
    ax.set_title(REPORT_TITLE);
    ax.set_xlabel(METRIC_AXIS_LABEL);
    ax.set_ylabel(CLASS_AXIS_LABEL);
}

/// Draw two reports into split cells: `first` upper-left, `second` lower-right
pub fn plot_overlay<K: AsRef<str>, N: AsRef<str>>(
    first: &ReportMatrix,
    second: &ReportMatrix,
    keys: &[K],
    target_names: &[N],
    ax: &mut Axes,
) -> Result<()> {
    first.ensure_same_shape(second)?;

    ax.split_cells(first, second, Colormap::Blues, Colormap::Oranges, SCALE_MAX);
    ax.invert_yaxis();

    let threshold = 0.5 * SCALE_MAX;
    for (row, col, value) in first.cells() {
        let other = second.get(row, col);
        ax.text(
            col as f64 - OVERLAY_TEXT_OFFSET,
            row as f64 - OVERLAY_TEXT_OFFSET,
            format_value(value),
            annotation_color(value, threshold),
        );
        ax.text(
            col as f64 + OVERLAY_TEXT_OFFSET,
            row as f64 + OVERLAY_TEXT_OFFSET,
            format_value(other),
            annotation_color(other, threshold),
        );
    }

    ax.add_legend_entry("first", Colormap::Blues.color(0.7));
    ax.add_legend_entry("second", Colormap::Oranges.color(0.7));
    ax.set_xticklabels(keys);
    ax.set_yticklabels(target_names);
    ax.set_title(COMPARE_TITLE);
    ax.set_xlabel(METRIC_AXIS_LABEL);
    ax.set_ylabel(CLASS_AXIS_LABEL);
    Ok(())
}

/// Which view a report renders
#[derive(Debug, Clone, PartialEq)]
pub enum ReportKind {
    /// Metrics of one set of predictions
    Single,
    /// Element-wise difference of two reports (already folded into the matrix)
    Difference,
    /// Two reports side by side; values are never combined
    Overlay { second: ReportMatrix },
}

/// A classification report heatmap, or a comparison of two of them
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    kind: ReportKind,
    matrix: ReportMatrix,
    keys: Vec<String>,
    target_names: Vec<String>,
    axes: Axes,
}

impl ClassificationReport {
    /// Compute the report for `y_true` vs `y_pred` and draw it
    pub fn new<L: Ord + Clone + Display>(
        y_true: &[L],
        y_pred: &[L],
        options: &ReportOptions,
    ) -> Result<Self> {
        let data = compute_report_matrix(y_true, y_pred, options)?;
        Self::from_data(data)
    }

    /// Wrap an already computed matrix
    pub fn from_data(data: ReportData) -> Result<Self> {
        Self::build(ReportKind::Single, data)
    }

    fn build(kind: ReportKind, data: ReportData) -> Result<Self> {
        let mut report = Self {
            kind,
            matrix: data.matrix,
            keys: data.keys,
            target_names: data.target_names,
            axes: Axes::new(),
        };
        let mut axes = Axes::new();
        report.plot(&mut axes)?;
        report.axes = axes;
        Ok(report)
    }

    /// Heatmap of `self - other`; both reports must share a shape
    pub fn difference(&self, other: &ClassificationReport) -> Result<Self> {
        let matrix = self.matrix.checked_sub(&other.matrix)?;
        Self::build(
            ReportKind::Difference,
            ReportData {
                matrix,
                keys: self.keys.clone(),
                target_names: self.target_names.clone(),
            },
        )
    }

    /// Split-cell comparison of `self` and `other`
    pub fn overlay(&self, other: &ClassificationReport) -> Result<Self> {
        self.matrix.ensure_same_shape(&other.matrix)?;
        Self::build(
            ReportKind::Overlay {
                second: other.matrix.clone(),
            },
            ReportData {
                matrix: self.matrix.clone(),
                keys: self.keys.clone(),
                target_names: self.target_names.clone(),
            },
        )
    }

    /// Draw this report's view onto `ax`
    pub fn plot(&self, ax: &mut Axes) -> Result<()> {
        match &self.kind {
            ReportKind::Single => {
                plot_report(&self.matrix, &self.keys, &self.target_names, ax);
            }
            ReportKind::Difference => {
                plot_report(&self.matrix, &self.keys, &self.target_names, ax);
                ax.set_title(DIFFERENCE_TITLE);
            }
            ReportKind::Overlay { second } => {
                plot_overlay(&self.matrix, second, &self.keys, &self.target_names, ax)?;
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &ReportKind {
        &self.kind
    }

    pub fn matrix(&self) -> &ReportMatrix {
        &self.matrix
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    /// The axes this report drew itself onto
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn render(&self, renderer: &Renderer) -> RgbImage {
        renderer.render(&self.axes)
    }

    pub fn save(&self, renderer: &Renderer, path: &Path) -> Result<()> {
        renderer.save(&self.axes, path)
    }
}

impl Sub for &ClassificationReport {
    type Output = Result<ClassificationReport>;

    fn sub(self, rhs: &ClassificationReport) -> Self::Output {
        self.difference(rhs)
    }
}

/// Overlay, not a sum
impl Add for &ClassificationReport {
    type Output = Result<ClassificationReport>;

    fn add(self, rhs: &ClassificationReport) -> Self::Output {
        self.overlay(rhs)
    }
}

/// Draw a classification report onto `ax` (or a fresh axes) and return it
pub fn classification_report<L: Ord + Clone + Display>(
    y_true: &[L],
    y_pred: &[L],
    options: &ReportOptions,
    ax: Option<Axes>,
) -> Result<Axes> {
    let mut ax = ax.unwrap_or_default();
    let data = compute_report_matrix(y_true, y_pred, options)?;
    plot_report(&data.matrix, &data.keys, &data.target_names, &mut ax);
    Ok(ax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::metrics::{METRIC_KEYS, ZeroDivision};
    use crate::plot::Artist;
    use crate::settings::RenderSettings;
    use approx::assert_relative_eq;

    const Y_TRUE: [i32; 8] = [0, 1, 2, 2, 1, 0, 2, 1];
    const Y_PRED: [i32; 8] = [0, 2, 2, 2, 1, 0, 1, 1];

    fn report() -> ClassificationReport {
        ClassificationReport::new(&Y_TRUE, &Y_PRED, &ReportOptions::new()).unwrap()
    }

    #[test]
    fn test_matrix_has_row_per_class_and_column_per_key() {
        let data = compute_report_matrix(&Y_TRUE, &Y_PRED, &ReportOptions::new()).unwrap();
        assert_eq!(data.matrix.shape(), (3, 4));
        assert_eq!(data.keys, METRIC_KEYS.to_vec());
        assert_eq!(data.target_names, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_matrix_values_match_metrics() {
        let data = compute_report_matrix(&Y_TRUE, &Y_PRED, &ReportOptions::new()).unwrap();
        // class 1: tp=2, fp=1, fn=1, support=3
        assert_relative_eq!(data.matrix.get(1, 0), 2.0 / 3.0);
        assert_relative_eq!(data.matrix.get(1, 1), 2.0 / 3.0);
        assert_relative_eq!(data.matrix.get(1, 2), 2.0 / 3.0);
        assert_eq!(data.matrix.get(1, 3), 3.0);
        // class 0 is perfect
        assert_eq!(data.matrix.row(0), &[1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_default_target_names_use_row_index() {
        let y_true = ["spam", "ham", "eggs", "ham"];
        let y_pred = ["spam", "ham", "ham", "ham"];
        let data = compute_report_matrix(&y_true, &y_pred, &ReportOptions::new()).unwrap();
        assert_eq!(data.target_names, vec!["0", "1", "2"]);
        assert_eq!(data.matrix.rows(), data.target_names.len());
    }

    #[test]
    fn test_classes_named_like_aggregates_are_kept() {
        let y_true = ["avg", "good", "avg", "good"];
        let y_pred = ["avg", "good", "good", "good"];
        let data = compute_report_matrix(&y_true, &y_pred, &ReportOptions::new()).unwrap();
        assert_eq!(data.matrix.rows(), 2);
        assert_eq!(data.target_names, vec!["0", "1"]);
        // "avg" sorts first: one of two true samples recalled
        assert_relative_eq!(data.matrix.get(0, 1), 0.5);
        assert_eq!(data.matrix.get(0, 3), 2.0);
    }

    #[test]
    fn test_target_names_like_aggregates_keep_every_row() {
        let options = ReportOptions::new().with_target_names(["accuracy", "ok"]);
        let data = compute_report_matrix(&[0, 1, 1], &[0, 1, 0], &options).unwrap();
        assert_eq!(data.matrix.rows(), 2);
        assert_eq!(data.target_names, vec!["accuracy", "ok"]);
        assert_eq!(data.matrix.get(1, 3), 2.0);
    }

    #[test]
    fn test_target_names_become_y_labels() {
        let options = ReportOptions::new().with_target_names(["A", "B"]);
        let report = ClassificationReport::new(&[0, 1, 1, 0], &[0, 1, 0, 0], &options).unwrap();
        assert_eq!(report.target_names(), &["A", "B"]);
        assert_eq!(report.axes().yticklabels(), &["A", "B"]);
    }

    #[test]
    fn test_plot_sets_labels_title_and_annotations() {
        let report = report();
        let ax = report.axes();
        assert_eq!(ax.title(), REPORT_TITLE);
        assert_eq!(ax.xlabel(), METRIC_AXIS_LABEL);
        assert_eq!(ax.ylabel(), CLASS_AXIS_LABEL);
        assert_eq!(ax.xticklabels(), &METRIC_KEYS);
        assert_eq!(ax.texts().count(), 12);
        assert!(ax.y_inverted());

        let Some(Artist::Image { vmin, vmax, .. }) = ax
            .artists()
            .iter()
            .find(|a| matches!(a, Artist::Image { .. }))
        else {
            panic!("no image artist");
        };
        assert_eq!((*vmin, *vmax), (0.0, 1.0));
    }

    #[test]
    fn test_difference_with_itself_is_zero() {
        let report = report();
        let diff = (&report - &report).unwrap();
        assert_eq!(diff.kind(), &ReportKind::Difference);
        assert!(diff.matrix().all_zero());
        assert_eq!(diff.axes().title(), DIFFERENCE_TITLE);
        assert_eq!(diff.target_names(), report.target_names());
    }

    #[test]
    fn test_difference_subtracts_elementwise() {
        let better = ClassificationReport::new(&Y_TRUE, &Y_TRUE, &ReportOptions::new()).unwrap();
        let worse = report();
        let diff = better.difference(&worse).unwrap();
        for (row, col, value) in diff.matrix().cells() {
            assert_relative_eq!(
                value,
                better.matrix().get(row, col) - worse.matrix().get(row, col)
            );
        }
        // supports are identical, so the support column cancels out
        assert_eq!(diff.matrix().get(2, 3), 0.0);
    }

    #[test]
    fn test_difference_shape_mismatch_is_generic_shape_error() {
        let three = report();
        let two = ClassificationReport::new(&[0, 1], &[0, 1], &ReportOptions::new()).unwrap();
        let err = (&three - &two).unwrap_err();
        assert!(matches!(
            err,
            ReportError::ShapeMismatch {
                left: (3, 4),
                right: (2, 4)
            }
        ));
    }

    #[test]
    fn test_overlay_keeps_both_matrices_unchanged() {
        let first = report();
        let second = ClassificationReport::new(&Y_TRUE, &Y_TRUE, &ReportOptions::new()).unwrap();
        let overlay = (&first + &second).unwrap();

        assert_eq!(overlay.matrix(), first.matrix());
        let ReportKind::Overlay { second: stored } = overlay.kind() else {
            panic!("expected overlay kind");
        };
        assert_eq!(stored, second.matrix());

        let ax = overlay.axes();
        assert_eq!(ax.title(), COMPARE_TITLE);
        assert!(ax.y_inverted());
        assert_eq!(ax.images().count(), 0);
        assert_eq!(ax.legend().len(), 2);
        // two values per cell, neither summed
        assert_eq!(ax.texts().count(), 24);
        let texts: Vec<_> = ax.texts().collect();
        assert_eq!(texts[0], (-0.25, -0.25, "1"));
        assert_eq!(texts[1], (0.25, 0.25, "1"));
    }

    #[test]
    fn test_overlay_shape_mismatch() {
        let three = report();
        let two = ClassificationReport::new(&[0, 1], &[1, 0], &ReportOptions::new()).unwrap();
        assert!(matches!(
            three.overlay(&two).unwrap_err(),
            ReportError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_zero_division_changes_only_undefined_cells() {
        // class 2 is never predicted
        let y_true = [0, 1, 2, 2, 0];
        let y_pred = [0, 1, 1, 0, 0];
        let zero = compute_report_matrix(
            &y_true,
            &y_pred,
            &ReportOptions::new().with_zero_division(ZeroDivision::Zero),
        )
        .unwrap();
        let one = compute_report_matrix(
            &y_true,
            &y_pred,
            &ReportOptions::new().with_zero_division(ZeroDivision::One),
        )
        .unwrap();

        let changed: Vec<(usize, usize)> = zero
            .matrix
            .cells()
            .filter(|(r, c, v)| one.matrix.get(*r, *c) != *v)
            .map(|(r, c, _)| (r, c))
            .collect();
        assert_eq!(changed, vec![(2, 0)]);
    }

    #[test]
    fn test_entry_point_is_deterministic() {
        let options =
            ReportOptions::new().with_sample_weight(vec![1.0, 2.0, 1.0, 0.5, 1.0, 1.0, 3.0, 1.0]);
        let first = classification_report(&Y_TRUE, &Y_PRED, &options, None).unwrap();
        let second = classification_report(&Y_TRUE, &Y_PRED, &options, None).unwrap();
        assert_eq!(
            first.images().collect::<Vec<_>>(),
            second.images().collect::<Vec<_>>()
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_entry_point_draws_on_supplied_axes() {
        let mut ax = Axes::new();
        ax.set_xlabel("will be replaced");
        let ax = classification_report(&Y_TRUE, &Y_PRED, &ReportOptions::new(), Some(ax)).unwrap();
        assert_eq!(ax.xlabel(), METRIC_AXIS_LABEL);
        assert_eq!(ax.images().count(), 1);
    }

    #[test]
    fn test_entry_point_propagates_metric_errors() {
        let err = classification_report(&[0, 1, 1], &[0, 1], &ReportOptions::new(), None)
            .unwrap_err();
        assert!(matches!(err, ReportError::LengthMismatch { .. }));
    }

    #[test]
    fn test_render_report_without_font() {
        let renderer = Renderer::without_text(RenderSettings::default());
        let img = report().render(&renderer);
        assert_eq!((img.width(), img.height()), renderer.image_size(report().axes()));
    }
}
