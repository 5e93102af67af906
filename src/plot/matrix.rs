//! Dense row-major matrix backing the report heatmaps

use std::ops::Sub;

use crate::error::{ReportError, Result};

/// Rows are classes, columns are metric keys
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl ReportMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Build from row vectors; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();
        let mut values = Vec::with_capacity(n_rows * cols);
        for row in rows {
            if row.len() != cols {
                return Err(ReportError::ShapeMismatch {
                    left: (n_rows, cols),
                    right: (1, row.len()),
                });
            }
            values.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            values,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.values[idx] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest value, or 0.0 for an empty matrix
    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0)
    }

    /// Iterate `(row, col, value)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i / self.cols.max(1), i % self.cols.max(1), *v))
    }

    /// Element-wise subtraction; shapes must match exactly
    pub fn checked_sub(&self, other: &ReportMatrix) -> Result<ReportMatrix> {
        self.ensure_same_shape(other)?;
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(ReportMatrix {
            rows: self.rows,
            cols: self.cols,
            values,
        })
    }

    pub fn ensure_same_shape(&self, other: &ReportMatrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(ReportError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    pub fn all_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

impl Sub for &ReportMatrix {
    type Output = Result<ReportMatrix>;

    fn sub(self, rhs: &ReportMatrix) -> Self::Output {
        self.checked_sub(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_access() {
        let m = ReportMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]])
            .unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.get(2, 1), 0.6);
        assert_eq!(m.row(1), &[0.3, 0.4]);
        assert_eq!(m.max(), 0.6);

        let cells: Vec<_> = m.cells().collect();
        assert_eq!(cells[3], (1, 1, 0.4));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = ReportMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, ReportError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_subtraction() {
        let a = ReportMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.25, 4.0]]).unwrap();
        let b = ReportMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.25, 1.0]]).unwrap();
        let diff = (&a - &b).unwrap();
        assert_eq!(diff.values(), &[0.5, 0.0, 0.0, 3.0]);
        assert!((&a - &a).unwrap().all_zero());
    }

    #[test]
    fn test_subtraction_shape_mismatch() {
        let a = ReportMatrix::zeros(2, 4);
        let b = ReportMatrix::zeros(3, 4);
        let err = (&a - &b).unwrap_err();
        assert!(matches!(
            err,
            ReportError::ShapeMismatch {
                left: (2, 4),
                right: (3, 4)
            }
        ));
    }

    #[test]
    fn test_set_and_max_of_empty() {
        let mut m = ReportMatrix::zeros(1, 2);
        m.set(0, 1, -2.0);
        assert_eq!(m.get(0, 1), -2.0);
        assert_eq!(m.max(), 0.0);
        assert_eq!(ReportMatrix::zeros(0, 0).max(), 0.0);
    }
}
