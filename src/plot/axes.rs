//! Drawing surface that records plot elements for later rasterization
//!
//! Cell (row, col) of any matrix artist is centered on data coordinate
//! (x = col, y = row). When the y axis is inverted, row 0 is drawn at the top.

use image::Rgb;

use super::colormap::Colormap;
use super::matrix::ReportMatrix;

/// Something drawn on the axes
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    /// Matrix drawn as colored cells on a fixed scale
    Image {
        matrix: ReportMatrix,
        colormap: Colormap,
        vmin: f64,
        vmax: f64,
    },
    /// Two matrices sharing each cell, split along the diagonal
    SplitCells {
        upper: ReportMatrix,
        lower: ReportMatrix,
        upper_colormap: Colormap,
        lower_colormap: Colormap,
        vmax: f64,
    },
    /// Text centered on a data coordinate
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Rgb<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    title: String,
    xlabel: String,
    ylabel: String,
    xticklabels: Vec<String>,
    yticklabels: Vec<String>,
    artists: Vec<Artist>,
    y_inverted: bool,
    legend: Vec<LegendEntry>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to an empty surface
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = label.into();
    }

    pub fn xlabel(&self) -> &str {
        &self.xlabel
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = label.into();
    }

    pub fn ylabel(&self) -> &str {
        &self.ylabel
    }

    /// Tick labels placed at x = 0, 1, ...
    pub fn set_xticklabels<S: AsRef<str>>(&mut self, labels: &[S]) {
        self.xticklabels = labels.iter().map(|s| s.as_ref().to_string()).collect();
    }

    pub fn xticklabels(&self) -> &[String] {
        &self.xticklabels
    }

    /// Tick labels placed at y = 0, 1, ...
    pub fn set_yticklabels<S: AsRef<str>>(&mut self, labels: &[S]) {
        self.yticklabels = labels.iter().map(|s| s.as_ref().to_string()).collect();
    }

    pub fn yticklabels(&self) -> &[String] {
        &self.yticklabels
    }

    /// Draw a matrix as an image with row 0 at the top
    pub fn imshow(&mut self, matrix: &ReportMatrix, colormap: Colormap, vmin: f64, vmax: f64) {
        self.artists.push(Artist::Image {
            matrix: matrix.clone(),
            colormap,
            vmin,
            vmax,
        });
        self.y_inverted = true;
    }

    /// Draw two same-shaped matrices into split cells on a 0..vmax scale
    pub fn split_cells(
        &mut self,
        upper: &ReportMatrix,
        lower: &ReportMatrix,
        upper_colormap: Colormap,
        lower_colormap: Colormap,
        vmax: f64,
    ) {
        self.artists.push(Artist::SplitCells {
            upper: upper.clone(),
            lower: lower.clone(),
            upper_colormap,
            lower_colormap,
            vmax,
        });
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, color: Rgb<u8>) {
        self.artists.push(Artist::Text {
            x,
            y,
            text: text.into(),
            color,
        });
    }

    pub fn invert_yaxis(&mut self) {
        self.y_inverted = !self.y_inverted;
    }

    pub fn y_inverted(&self) -> bool {
        self.y_inverted
    }

    pub fn add_legend_entry(&mut self, label: impl Into<String>, color: Rgb<u8>) {
        self.legend.push(LegendEntry {
            label: label.into(),
            color,
        });
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Text artists as `(x, y, text)`
    pub fn texts(&self) -> impl Iterator<Item = (f64, f64, &str)> {
        self.artists.iter().filter_map(|artist| match artist {
            Artist::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
            _ => None,
        })
    }

    /// Matrices drawn as plain images
    pub fn images(&self) -> impl Iterator<Item = &ReportMatrix> {
        self.artists.iter().filter_map(|artist| match artist {
            Artist::Image { matrix, .. } => Some(matrix),
            _ => None,
        })
    }

    /// Number of (columns, rows) covered by the matrix artists and tick labels
    pub fn grid_extent(&self) -> (usize, usize) {
        let mut cols = self.xticklabels.len();
        let mut rows = self.yticklabels.len();
        for artist in &self.artists {
            let shape = match artist {
                Artist::Image { matrix, .. } => matrix.shape(),
                Artist::SplitCells { upper, .. } => upper.shape(),
                Artist::Text { .. } => continue,
            };
            rows = rows.max(shape.0);
            cols = cols.max(shape.1);
        }
        (cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_labels_and_artists() {
        let mut ax = Axes::new();
        ax.set_title("Title");
        ax.set_xlabel("Metric");
        ax.set_ylabel("Class");
        ax.set_xticklabels(&["a", "b", "c"]);
        ax.set_yticklabels(&vec!["x".to_string()]);
        ax.text(1.0, 0.0, "0.50", Rgb([0, 0, 0]));

        assert_eq!(ax.title(), "Title");
        assert_eq!(ax.xlabel(), "Metric");
        assert_eq!(ax.ylabel(), "Class");
        assert_eq!(ax.xticklabels(), &["a", "b", "c"]);
        assert_eq!(ax.yticklabels(), &["x"]);
        assert_eq!(ax.texts().collect::<Vec<_>>(), vec![(1.0, 0.0, "0.50")]);
        assert_eq!(ax.grid_extent(), (3, 1));
    }

    #[test]
    fn test_imshow_puts_origin_at_top() {
        let mut ax = Axes::new();
        assert!(!ax.y_inverted());
        ax.imshow(&ReportMatrix::zeros(2, 4), Colormap::OrRd, 0.0, 1.0);
        assert!(ax.y_inverted());
        assert_eq!(ax.images().count(), 1);
        assert_eq!(ax.grid_extent(), (4, 2));
    }

    #[test]
    fn test_invert_toggles_and_clear_resets() {
        let mut ax = Axes::new();
        ax.invert_yaxis();
        assert!(ax.y_inverted());
        ax.invert_yaxis();
        assert!(!ax.y_inverted());

        ax.set_title("something");
        ax.add_legend_entry("first", Rgb([1, 2, 3]));
        ax.clear();
        assert_eq!(ax, Axes::new());
    }
}
