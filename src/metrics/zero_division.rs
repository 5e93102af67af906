//! Zero-division policy for ill-defined metrics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Value substituted when a metric's denominator is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDivision {
    /// Substitute 0.0 and log a warning
    Warn,
    /// Substitute 0.0 silently
    #[default]
    #[serde(alias = "0")]
    Zero,
    /// Substitute 1.0 silently
    #[serde(alias = "1")]
    One,
}

impl ZeroDivision {
    pub fn value(&self) -> f64 {
        match self {
            ZeroDivision::Warn | ZeroDivision::Zero => 0.0,
            ZeroDivision::One => 1.0,
        }
    }

    pub fn warns(&self) -> bool {
        matches!(self, ZeroDivision::Warn)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZeroDivision::Warn => "warn",
            ZeroDivision::Zero => "0",
            ZeroDivision::One => "1",
        }
    }
}

impl fmt::Display for ZeroDivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ZeroDivision {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(ZeroDivision::Warn),
            "0" | "0.0" | "zero" => Ok(ZeroDivision::Zero),
            "1" | "1.0" | "one" => Ok(ZeroDivision::One),
            other => Err(ReportError::InvalidZeroDivision(other.to_string())),
        }
    }
}
