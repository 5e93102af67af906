//! Plotting primitives: matrix, drawing surface, colormaps and rasterizer

pub mod annotate;
pub mod axes;
pub mod colormap;
pub mod font;
pub mod matrix;
pub mod render;

pub use annotate::{add_values_to_matrix, format_value};
pub use axes::{Artist, Axes, LegendEntry};
pub use colormap::Colormap;
pub use font::{find_font, load_font_file};
pub use matrix::ReportMatrix;
pub use render::Renderer;
