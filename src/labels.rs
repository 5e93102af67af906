//! Label files and synthetic label generation for the CLI
//!
//! Label files are CSV with a `y_true,y_pred[,weight]` header. Blank lines
//! and lines starting with `#` are skipped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ReportError, Result};

/// Ground truth, predictions and optional weights read from one source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelSet {
    pub y_true: Vec<String>,
    pub y_pred: Vec<String>,
    pub sample_weight: Option<Vec<f64>>,
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut set = LabelSet::default();
        let mut weights = Vec::new();
        let mut has_weights = None;
        let mut header_seen = false;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();

            if !header_seen {
                header_seen = true;
                if fields.first().is_some_and(|f| f.eq_ignore_ascii_case("y_true")) {
                    has_weights = Some(fields.len() >= 3);
                    continue;
                }
            }

            let expects_weight = *has_weights.get_or_insert(fields.len() >= 3);
            let expected = if expects_weight { 3 } else { 2 };
            if fields.len() != expected {
                return Err(ReportError::LabelParse {
                    line: line_no,
                    reason: format!("expected {} fields, found {}", expected, fields.len()),
                });
            }

            set.y_true.push(fields[0].to_string());
            set.y_pred.push(fields[1].to_string());
            if expects_weight {
                let weight = fields[2].parse::<f64>().map_err(|e| ReportError::LabelParse {
                    line: line_no,
                    reason: format!("invalid weight '{}': {}", fields[2], e),
                })?;
                weights.push(weight);
            }
        }

        if has_weights == Some(true) {
            set.sample_weight = Some(weights);
        }
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let set = Self::parse(&content)?;
        info!("Loaded {} samples from {}", set.len(), path.display());
        Ok(set)
    }

    /// Random labels where each prediction is correct with probability
    /// `accuracy`, otherwise a uniformly drawn class
    pub fn synthetic(n_classes: usize, n_samples: usize, accuracy: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n_classes = n_classes.max(1);
        let accuracy = accuracy.clamp(0.0, 1.0);

        let mut set = LabelSet::default();
        for _ in 0..n_samples {
            let truth = rng.gen_range(0..n_classes);
            let pred = if rng.gen_bool(accuracy) {
                truth
            } else {
                rng.gen_range(0..n_classes)
            };
            set.y_true.push(format!("class_{}", truth));
            set.y_pred.push(format!("class_{}", pred));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header_and_weights() {
        let set = LabelSet::parse(
            "y_true,y_pred,weight\n# comment\ncat,cat,1.0\n\ndog, cat ,2.5\n",
        )
        .unwrap();
        assert_eq!(set.y_true, vec!["cat", "dog"]);
        assert_eq!(set.y_pred, vec!["cat", "cat"]);
        assert_eq!(set.sample_weight, Some(vec![1.0, 2.5]));
    }

    #[test]
    fn test_parse_without_header() {
        let set = LabelSet::parse("0,1\n1,1\n").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.sample_weight.is_none());
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let err = LabelSet::parse("y_true,y_pred\na,b\nc\n").unwrap_err();
        assert!(matches!(err, ReportError::LabelParse { line: 3, .. }));

        let err = LabelSet::parse("y_true,y_pred,weight\na,b,heavy\n").unwrap_err();
        assert!(matches!(err, ReportError::LabelParse { line: 2, .. }));
    }

    #[test]
    fn test_synthetic_is_seeded() {
        let a = LabelSet::synthetic(3, 50, 0.8, 7);
        let b = LabelSet::synthetic(3, 50, 0.8, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.y_true.iter().all(|l| l.starts_with("class_")));
    }

    #[test]
    fn test_synthetic_perfect_accuracy() {
        let set = LabelSet::synthetic(4, 20, 1.0, 1);
        assert_eq!(set.y_true, set.y_pred);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.csv");
        fs::write(&path, "y_true,y_pred\nx,y\n").unwrap();
        let set = LabelSet::load(&path).unwrap();
        assert_eq!(set.y_pred, vec!["y"]);
    }
}
