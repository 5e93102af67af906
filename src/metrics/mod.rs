//! Per-class classification metrics
//!
//! Computes precision, recall, F1 and support for every class present in the
//! ground truth or the predictions, plus the accuracy and averaged rows of a
//! classic classification report.

pub mod report;
pub mod scores;
pub mod zero_division;

pub use report::{
    ACCURACY_KEY, MACRO_AVG_KEY, MetricsReport, ReportEntry, ReportOptions, WEIGHTED_AVG_KEY,
    classification_report_dict,
};
pub use scores::{ClassScores, METRIC_KEYS, precision_recall_fscore_support, unique_labels};
pub use zero_division::ZeroDivision;
