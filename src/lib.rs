//! classreport - classification report heatmaps
//!
//! Computes per-class precision/recall/F1/support from labels and predictions,
//! draws them as an annotated heatmap and compares two reports as a
//! difference heatmap or a split-cell overlay.

pub mod error;
pub mod labels;
pub mod metrics;
pub mod plot;
pub mod report;
pub mod settings;

// Re-export commonly used types for convenience
pub use error::{ReportError, Result};
pub use labels::LabelSet;
pub use metrics::{
    ClassScores, MetricsReport, ReportEntry, ReportOptions, ZeroDivision,
    classification_report_dict, precision_recall_fscore_support,
};
pub use plot::{Axes, Colormap, Renderer, ReportMatrix};
pub use report::{
    ClassificationReport, ReportData, ReportKind, classification_report, compute_report_matrix,
    plot_overlay, plot_report,
};
pub use settings::{RenderSettings, ReportSettings};
