//! Persistent rendering and report settings
//!
//! Loaded from a TOML or JSON file. Missing files and malformed content fall
//! back to defaults so a broken config never blocks a report.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ReportError, Result};
use crate::metrics::ZeroDivision;

/// Default config location used by the CLI
pub const SETTINGS_FILE: &str = "config/classreport.toml";

fn default_cell_width() -> u32 {
    110
}
fn default_cell_height() -> u32 {
    56
}
fn default_margin_left() -> u32 {
    150
}
fn default_margin_top() -> u32 {
    70
}
fn default_margin_right() -> u32 {
    40
}
fn default_margin_bottom() -> u32 {
    90
}
fn default_font_size() -> f32 {
    18.0
}
fn default_title_font_size() -> f32 {
    24.0
}
fn default_background() -> [u8; 3] {
    [255, 255, 255]
}
fn default_digits() -> usize {
    2
}

/// Layout and font settings for the raster renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Pixels per matrix column
    #[serde(default = "default_cell_width")]
    pub cell_width: u32,
    /// Pixels per matrix row
    #[serde(default = "default_cell_height")]
    pub cell_height: u32,
    #[serde(default = "default_margin_left")]
    pub margin_left: u32,
    #[serde(default = "default_margin_top")]
    pub margin_top: u32,
    #[serde(default = "default_margin_right")]
    pub margin_right: u32,
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: u32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_title_font_size")]
    pub title_font_size: f32,
    /// TTF/OTF/TTC file; system fonts are searched when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            margin_left: default_margin_left(),
            margin_top: default_margin_top(),
            margin_right: default_margin_right(),
            margin_bottom: default_margin_bottom(),
            font_size: default_font_size(),
            title_font_size: default_title_font_size(),
            font_path: None,
            background: default_background(),
        }
    }
}

/// Report defaults read by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub zero_division: ZeroDivision,
    /// Decimal places in the text table
    #[serde(default = "default_digits")]
    pub digits: usize,
    #[serde(default)]
    pub render: RenderSettings,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            zero_division: ZeroDivision::default(),
            digits: default_digits(),
            render: RenderSettings::default(),
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<()> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ReportError::InvalidSettings(format!(
                "cell size must be positive, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        for (name, size) in [
            ("font_size", self.font_size),
            ("title_font_size", self.title_font_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ReportError::InvalidSettings(format!(
                    "{} must be positive, got {}",
                    name, size
                )));
            }
        }
        Ok(())
    }
}

impl ReportSettings {
    /// Parse and validate settings, picking the format from the file extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let settings: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        settings.render.validate()?;
        Ok(settings)
    }

    /// Load settings from file, or return defaults if it is missing or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: ReportSettings = toml::from_str(
            r#"
zero_division = "1"

[render]
cell_width = 80
font_path = "/tmp/font.ttf"
"#,
        )
        .unwrap();
        assert_eq!(settings.zero_division, ZeroDivision::One);
        assert_eq!(settings.digits, 2);
        assert_eq!(settings.render.cell_width, 80);
        assert_eq!(settings.render.cell_height, default_cell_height());
        assert_eq!(
            settings.render.font_path.as_deref(),
            Some(Path::new("/tmp/font.ttf"))
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReportSettings::load(&dir.path().join("absent.toml"));
        assert_eq!(settings, ReportSettings::default());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "digits = [not valid").unwrap();
        assert!(ReportSettings::from_file(&path).is_err());
        assert_eq!(ReportSettings::load(&path), ReportSettings::default());
    }

    #[test]
    fn test_zero_cell_size_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.toml");
        fs::write(&path, "digits = 3\n\n[render]\ncell_height = 0\n").unwrap();
        assert!(matches!(
            ReportSettings::from_file(&path).unwrap_err(),
            ReportError::InvalidSettings(_)
        ));
        assert_eq!(ReportSettings::load(&path), ReportSettings::default());
    }

    #[test]
    fn test_non_positive_font_size_is_rejected() {
        let settings = RenderSettings {
            font_size: 0.0,
            ..RenderSettings::default()
        };
        assert!(settings.validate().is_err());
        assert!(RenderSettings::default().validate().is_ok());
    }

    #[test]
    fn test_save_then_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.json");
        let mut settings = ReportSettings::default();
        settings.digits = 3;
        settings.zero_division = ZeroDivision::Warn;
        settings.render.background = [10, 20, 30];
        settings.save(&path).unwrap();

        assert_eq!(ReportSettings::load(&path), settings);
    }
}
