//! Error types shared by the metrics, plotting and rendering layers

use thiserror::Error;

/// Errors raised while computing or rendering a classification report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Found input variables with inconsistent numbers of samples: [{y_true}, {y_pred}]")]
    LengthMismatch { y_true: usize, y_pred: usize },

    #[error("sample_weight has {weights} entries, expected {samples}")]
    SampleWeightLength { weights: usize, samples: usize },

    #[error("Invalid sample weight at index {index}: {value}")]
    InvalidSampleWeight { index: usize, value: f64 },

    #[error("Cannot compute a classification report on empty input")]
    EmptyInput,

    #[error("Number of classes, {classes}, does not match size of target_names, {names}")]
    TargetNamesMismatch { classes: usize, names: usize },

    #[error("Shapes {left:?} and {right:?} are not compatible")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Invalid zero_division value: {0}")]
    InvalidZeroDivision(String),

    #[error("Failed to parse label file at line {line}: {reason}")]
    LabelParse { line: usize, reason: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_error_display() {
        let err = ReportError::LengthMismatch {
            y_true: 3,
            y_pred: 2,
        };
        assert!(format!("{}", err).contains("inconsistent numbers of samples"));
        assert!(format!("{}", err).contains("[3, 2]"));

        let err = ReportError::ShapeMismatch {
            left: (2, 4),
            right: (3, 4),
        };
        assert!(format!("{}", err).contains("(2, 4)"));
        assert!(format!("{}", err).contains("(3, 4)"));

        let err = ReportError::TargetNamesMismatch {
            classes: 3,
            names: 2,
        };
        assert!(format!("{}", err).contains("target_names, 2"));

        let err = ReportError::EmptyInput;
        assert!(format!("{}", err).contains("empty input"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ReportError = io.into();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
