//! Precision, recall, F1 and support per class

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::zero_division::ZeroDivision;
use crate::error::{ReportError, Result};

/// Metric column names in report order
pub const METRIC_KEYS: [&str; 4] = ["precision", "recall", "f1-score", "support"];

/// Scores for a single class (or an averaged row)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    /// Weighted count of true samples
    pub support: f64,
}

impl ClassScores {
    /// Metric values in [`METRIC_KEYS`] order
    pub fn values(&self) -> [f64; 4] {
        [self.precision, self.recall, self.f1_score, self.support]
    }

    /// Ordered (key, value) pairs
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        METRIC_KEYS.iter().copied().zip(self.values()).collect()
    }
}

/// Sorted union of the labels seen in the ground truth and the predictions
pub fn unique_labels<L: Ord + Clone>(y_true: &[L], y_pred: &[L]) -> Vec<L> {
    let labels: BTreeSet<&L> = y_true.iter().chain(y_pred.iter()).collect();
    labels.into_iter().cloned().collect()
}

/// Validate label/prediction/weight shapes
pub(crate) fn check_inputs<L>(
    y_true: &[L],
    y_pred: &[L],
    sample_weight: Option<&[f64]>,
) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(ReportError::LengthMismatch {
            y_true: y_true.len(),
            y_pred: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    if let Some(weights) = sample_weight {
        if weights.len() != y_true.len() {
            return Err(ReportError::SampleWeightLength {
                weights: weights.len(),
                samples: y_true.len(),
            });
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ReportError::InvalidSampleWeight { index, value });
        }
    }
    Ok(())
}

/// Divide, substituting the zero-division value for a zero denominator.
/// Returns whether a substitution happened.
pub(crate) fn prf_divide(
    numerator: f64,
    denominator: f64,
    zero_division: ZeroDivision,
) -> (f64, bool) {
    if denominator == 0.0 {
        (zero_division.value(), true)
    } else {
        (numerator / denominator, false)
    }
}

/// Compute per-class scores for `labels`, in the given order.
///
/// Samples whose true or predicted label is not in `labels` only count
/// towards the classes they do match.
pub fn precision_recall_fscore_support<L: Ord + Clone>(
    y_true: &[L],
    y_pred: &[L],
    labels: &[L],
    sample_weight: Option<&[f64]>,
    zero_division: ZeroDivision,
) -> Result<Vec<ClassScores>> {
    check_inputs(y_true, y_pred, sample_weight)?;

    let index: BTreeMap<&L, usize> = labels.iter().enumerate().map(|(i, l)| (l, i)).collect();
    let n_labels = labels.len();
    let mut tp_sum = vec![0.0; n_labels];
    let mut pred_sum = vec![0.0; n_labels];
    let mut true_sum = vec![0.0; n_labels];

    for (i, (truth, pred)) in y_true.iter().zip(y_pred.iter()).enumerate() {
        let weight = sample_weight.map_or(1.0, |w| w[i]);
        if let Some(&t) = index.get(truth) {
            true_sum[t] += weight;
            if truth == pred {
                tp_sum[t] += weight;
            }
        }
        if let Some(&p) = index.get(pred) {
            pred_sum[p] += weight;
        }
    }

    let mut precision_ill_defined = false;
    let mut recall_ill_defined = false;
    let mut f_ill_defined = false;

    let scores = (0..n_labels)
        .map(|i| {
            let tp = tp_sum[i];
            let fp = pred_sum[i] - tp;
            let fn_ = true_sum[i] - tp;

            let (precision, p_bad) = prf_divide(tp, tp + fp, zero_division);
            let (recall, r_bad) = prf_divide(tp, tp + fn_, zero_division);
            let (f1_score, f_bad) = prf_divide(2.0 * tp, 2.0 * tp + fp + fn_, zero_division);
            precision_ill_defined |= p_bad;
            recall_ill_defined |= r_bad;
            f_ill_defined |= f_bad;

            ClassScores {
                precision,
                recall,
                f1_score,
                support: true_sum[i],
            }
        })
        .collect();

    if zero_division.warns() {
        if precision_ill_defined {
            warn!(
                "Precision is ill-defined and being set to 0.0 in labels with no predicted samples"
            );
        }
        if recall_ill_defined {
            warn!("Recall is ill-defined and being set to 0.0 in labels with no true samples");
        }
        if f_ill_defined {
            warn!(
                "F-score is ill-defined and being set to 0.0 in labels with no true nor predicted samples"
            );
        }
    }

    Ok(scores)
}
