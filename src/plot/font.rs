//! Font discovery for text layers

use ab_glyph::FontVec;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ReportError, Result};

// Common locations on Linux, macOS and Windows
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a font file; collections use their first face
pub fn load_font_file(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)?;
    FontVec::try_from_vec_and_index(data, 0)
        .map_err(|e| ReportError::Font(format!("{}: {}", path.display(), e)))
}

/// Explicit path first, then the system candidates
pub fn find_font(explicit: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = explicit {
        match load_font_file(path) {
            Ok(font) => return Some(font),
            Err(e) => warn!("Failed to load configured font: {}", e),
        }
    }

    for candidate in FONT_CANDIDATES {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match load_font_file(path) {
            Ok(font) => {
                debug!("Using font {}", candidate);
                return Some(font);
            }
            Err(e) => debug!("Skipping font {}: {}", candidate, e),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_font_file(Path::new("/definitely/not/a/font.ttf")).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn test_garbage_bytes_are_font_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.ttf");
        fs::write(&path, b"not a font at all").unwrap();
        let err = load_font_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::Font(_)));
    }
}
