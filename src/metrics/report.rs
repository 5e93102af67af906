//! Structured classification report (ordered dictionary of per-class rows)

use std::fmt::{Display, Write as FmtWrite};
use std::fs;
use std::path::Path;

use chrono::Local;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::scores::{
    ClassScores, METRIC_KEYS, check_inputs, precision_recall_fscore_support, prf_divide,
    unique_labels,
};
use super::zero_division::ZeroDivision;
use crate::error::{ReportError, Result};

pub const ACCURACY_KEY: &str = "accuracy";
pub const MACRO_AVG_KEY: &str = "macro avg";
pub const WEIGHTED_AVG_KEY: &str = "weighted avg";

/// Options forwarded to the metrics computation
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Display names for the classes, in sorted label order
    pub target_names: Option<Vec<String>>,
    /// Per-sample weights
    pub sample_weight: Option<Vec<f64>>,
    pub zero_division: ZeroDivision,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.target_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sample_weight(mut self, weights: Vec<f64>) -> Self {
        self.sample_weight = Some(weights);
        self
    }

    pub fn with_zero_division(mut self, zero_division: ZeroDivision) -> Self {
        self.zero_division = zero_division;
        self
    }
}

/// One row of the report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEntry {
    /// Per-class metrics
    Class { name: String, scores: ClassScores },
    /// Overall (weighted) fraction of correct predictions
    Accuracy(f64),
    /// Macro or weighted average
    Average { name: String, scores: ClassScores },
}

impl ReportEntry {
    pub fn name(&self) -> &str {
        match self {
            ReportEntry::Class { name, .. } | ReportEntry::Average { name, .. } => name,
            ReportEntry::Accuracy(_) => ACCURACY_KEY,
        }
    }

    /// Metric mapping for row entries; `None` for the accuracy scalar
    pub fn metrics(&self) -> Option<Vec<(&'static str, f64)>> {
        match self {
            ReportEntry::Class { scores, .. } | ReportEntry::Average { scores, .. } => {
                Some(scores.metrics())
            }
            ReportEntry::Accuracy(_) => None,
        }
    }

    fn to_json_value(&self) -> Value {
        match self {
            ReportEntry::Accuracy(value) => json!(value),
            ReportEntry::Class { scores, .. } | ReportEntry::Average { scores, .. } => {
                let mut row = Map::new();
                for (key, value) in scores.metrics() {
                    row.insert(key.to_string(), json!(value));
                }
                Value::Object(row)
            }
        }
    }
}

/// Classification report in insertion order: classes, accuracy, averages
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub entries: Vec<ReportEntry>,
}

impl MetricsReport {
    pub fn get(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.entries.iter().find_map(|entry| match entry {
            ReportEntry::Accuracy(value) => Some(*value),
            _ => None,
        })
    }

    /// Per-class entries only
    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassScores)> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Class { name, scores } => Some((name.as_str(), scores)),
            _ => None,
        })
    }

    /// Report as a JSON object keyed by entry name, preserving order
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for entry in &self.entries {
            map.insert(entry.name().to_string(), entry.to_json_value());
        }
        Value::Object(map)
    }

    /// Save the report together with a generation timestamp
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let document = json!({
            "generated_at": Local::now().to_rfc3339(),
            "report": self.to_json(),
        });
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        info!("Saved classification report to {}", path.display());
        Ok(())
    }

    /// Text table in the familiar console layout
    pub fn format_table(&self, digits: usize) -> String {
        let name_width = self
            .entries
            .iter()
            .map(|entry| entry.name().len())
            .max()
            .unwrap_or(0)
            .max(WEIGHTED_AVG_KEY.len());
        let col_width = 9.max(digits + 2);

        let mut output = String::new();
        let _ = write!(output, "{:>name_width$}", "");
        for key in METRIC_KEYS {
            let _ = write!(output, " {:>col_width$}", key);
        }
        output.push_str("\n\n");

        let mut seen_class_block = false;
        for entry in &self.entries {
            match entry {
                ReportEntry::Class { name, scores } => {
                    seen_class_block = true;
                    write_row(&mut output, name, scores, name_width, col_width, digits);
                }
                ReportEntry::Accuracy(value) => {
                    if seen_class_block {
                        output.push('\n');
                        seen_class_block = false;
                    }
                    let support = self.total_support();
                    let _ = writeln!(
                        output,
                        "{:>name_width$} {:>col_width$} {:>col_width$} {:>col_width$.digits$} {:>col_width$.0}",
                        ACCURACY_KEY, "", "", value, support
                    );
                }
                ReportEntry::Average { name, scores } => {
                    if seen_class_block {
                        output.push('\n');
                        seen_class_block = false;
                    }
                    write_row(&mut output, name, scores, name_width, col_width, digits);
                }
            }
        }
        output
    }

    fn total_support(&self) -> f64 {
        self.classes().map(|(_, scores)| scores.support).sum()
    }
}

fn write_row(
    output: &mut String,
    name: &str,
    scores: &ClassScores,
    name_width: usize,
    col_width: usize,
    digits: usize,
) {
    let _ = writeln!(
        output,
        "{:>name_width$} {:>col_width$.digits$} {:>col_width$.digits$} {:>col_width$.digits$} {:>col_width$.0}",
        name, scores.precision, scores.recall, scores.f1_score, scores.support
    );
}

/// Build the structured report for the given labels and predictions.
///
/// Classes are the sorted union of both label sets. Rows are named by
/// `target_names` when supplied, otherwise by each label's `Display`.
pub fn classification_report_dict<L: Ord + Clone + Display>(
    y_true: &[L],
    y_pred: &[L],
    options: &ReportOptions,
) -> Result<MetricsReport> {
    let weights = options.sample_weight.as_deref();
    check_inputs(y_true, y_pred, weights)?;

    let labels = unique_labels(y_true, y_pred);
    let names: Vec<String> = match &options.target_names {
        Some(names) if names.len() != labels.len() => {
            return Err(ReportError::TargetNamesMismatch {
                classes: labels.len(),
                names: names.len(),
            });
        }
        Some(names) => names.clone(),
        None => labels.iter().map(|label| label.to_string()).collect(),
    };

    let scores =
        precision_recall_fscore_support(y_true, y_pred, &labels, weights, options.zero_division)?;
    debug!("Computed scores for {} classes", scores.len());

    let mut entries: Vec<ReportEntry> = names
        .into_iter()
        .zip(scores.iter())
        .map(|(name, scores)| ReportEntry::Class {
            name,
            scores: *scores,
        })
        .collect();

    entries.push(ReportEntry::Accuracy(accuracy(
        y_true,
        y_pred,
        weights,
        options.zero_division,
    )));
    entries.push(ReportEntry::Average {
        name: MACRO_AVG_KEY.to_string(),
        scores: macro_average(&scores),
    });
    entries.push(ReportEntry::Average {
        name: WEIGHTED_AVG_KEY.to_string(),
        scores: weighted_average(&scores, options.zero_division),
    });

    Ok(MetricsReport { entries })
}

fn accuracy<L: PartialEq>(
    y_true: &[L],
    y_pred: &[L],
    weights: Option<&[f64]>,
    zero_division: ZeroDivision,
) -> f64 {
    let mut correct = 0.0;
    let mut total = 0.0;
    for (i, (truth, pred)) in y_true.iter().zip(y_pred.iter()).enumerate() {
        let weight = weights.map_or(1.0, |w| w[i]);
        total += weight;
        if truth == pred {
            correct += weight;
        }
    }
    prf_divide(correct, total, zero_division).0
}

fn macro_average(scores: &[ClassScores]) -> ClassScores {
    let n = scores.len().max(1) as f64;
    ClassScores {
        precision: scores.iter().map(|s| s.precision).sum::<f64>() / n,
        recall: scores.iter().map(|s| s.recall).sum::<f64>() / n,
        f1_score: scores.iter().map(|s| s.f1_score).sum::<f64>() / n,
        support: scores.iter().map(|s| s.support).sum(),
    }
}

fn weighted_average(scores: &[ClassScores], zero_division: ZeroDivision) -> ClassScores {
    let total: f64 = scores.iter().map(|s| s.support).sum();
    let weighted = |metric: fn(&ClassScores) -> f64| {
        let sum: f64 = scores.iter().map(|s| metric(s) * s.support).sum();
        prf_divide(sum, total, zero_division).0
    };
    ClassScores {
        precision: weighted(|s| s.precision),
        recall: weighted(|s| s.recall),
        f1_score: weighted(|s| s.f1_score),
        support: total,
    }
}
