//! Rasterize an [`Axes`] into an RGB image

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::axes::{Artist, Axes};
use super::colormap::Colormap;
use super::font::find_font;
use super::matrix::ReportMatrix;
use crate::error::Result;
use crate::settings::RenderSettings;

const TEXT_COLOR: Rgb<u8> = Rgb([30, 30, 30]);
const FRAME_COLOR: Rgb<u8> = Rgb([60, 60, 60]);
const DIVIDER_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LEGEND_SWATCH: u32 = 16;
const TICK_GAP: i32 = 8;

/// Pixel placement of the cell grid
#[derive(Debug, Clone, Copy)]
struct Layout {
    x0: i32,
    y0: i32,
    cell_w: u32,
    cell_h: u32,
    cols: usize,
    rows: usize,
    y_inverted: bool,
}

impl Layout {
    /// Top-left pixel of cell (row, col)
    fn cell_origin(&self, row: usize, col: usize) -> (i32, i32) {
        let x = self.x0 + (col as u32 * self.cell_w) as i32;
        let slot = if self.y_inverted {
            row
        } else {
            self.rows.saturating_sub(1 + row)
        };
        let y = self.y0 + (slot as u32 * self.cell_h) as i32;
        (x, y)
    }

    /// Pixel position of a data coordinate
    fn data_to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let px = self.x0 as f64 + (x + 0.5) * self.cell_w as f64;
        let py = if self.y_inverted {
            self.y0 as f64 + (y + 0.5) * self.cell_h as f64
        } else {
            self.y0 as f64 + (self.rows as f64 - 0.5 - y) * self.cell_h as f64
        };
        (px as f32, py as f32)
    }

    fn grid_width(&self) -> u32 {
        self.cols as u32 * self.cell_w
    }

    fn grid_height(&self) -> u32 {
        self.rows as u32 * self.cell_h
    }
}

/// Turns recorded axes into pixels
pub struct Renderer {
    settings: RenderSettings,
    font: Option<FontVec>,
}

impl Renderer {
    /// Build a renderer, searching for a font per the settings
    pub fn new(settings: RenderSettings) -> Self {
        let font = find_font(settings.font_path.as_deref());
        if font.is_none() {
            warn!("No usable font found; text layers will be skipped");
        }
        Self { settings, font }
    }

    /// Renderer that only draws cells and frames
    pub fn without_text(settings: RenderSettings) -> Self {
        Self {
            settings,
            font: None,
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    // Zero-sized cells are widened to one pixel; imageproc rejects empty rects
    fn layout(&self, ax: &Axes) -> Layout {
        let (cols, rows) = ax.grid_extent();
        Layout {
            x0: self.settings.margin_left as i32,
            y0: self.settings.margin_top as i32,
            cell_w: self.settings.cell_width.max(1),
            cell_h: self.settings.cell_height.max(1),
            cols,
            rows,
            y_inverted: ax.y_inverted(),
        }
    }

    /// Output image size for the given axes
    pub fn image_size(&self, ax: &Axes) -> (u32, u32) {
        let layout = self.layout(ax);
        let legend_height = if ax.legend().is_empty() {
            0
        } else {
            LEGEND_SWATCH + 12
        };
        let width = self.settings.margin_left + layout.grid_width() + self.settings.margin_right;
        let height = self.settings.margin_top
            + layout.grid_height()
            + self.settings.margin_bottom
            + legend_height;
        (width.max(1), height.max(1))
    }

    pub fn render(&self, ax: &Axes) -> RgbImage {
        let layout = self.layout(ax);
        let (width, height) = self.image_size(ax);
        let mut img = RgbImage::from_pixel(width, height, Rgb(self.settings.background));

        for artist in ax.artists() {
            match artist {
                Artist::Image {
                    matrix,
                    colormap,
                    vmin,
                    vmax,
                } => {
                    for (row, col, value) in matrix.cells() {
                        let color = colormap.color_for(value, *vmin, *vmax);
                        fill_cell(&mut img, &layout, row, col, color);
                    }
                }
                Artist::SplitCells {
                    upper,
                    lower,
                    upper_colormap,
                    lower_colormap,
                    vmax,
                } => draw_split_cells(
                    &mut img,
                    &layout,
                    (upper, lower),
                    (*upper_colormap, *lower_colormap),
                    *vmax,
                ),
                Artist::Text { .. } => {}
            }
        }

        if layout.cols > 0 && layout.rows > 0 {
            draw_hollow_rect_mut(
                &mut img,
                Rect::at(layout.x0, layout.y0).of_size(layout.grid_width(), layout.grid_height()),
                FRAME_COLOR,
            );
        }

        if let Some(font) = &self.font {
            self.draw_text_layers(&mut img, &layout, ax, font);
        }

        img
    }

    /// Render and write a PNG, creating parent directories as needed
    pub fn save(&self, ax: &Axes, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let img = self.render(ax);
        img.save(path)?;
        info!(
            "Saved {}x{} plot to {}",
            img.width(),
            img.height(),
            path.display()
        );
        Ok(())
    }

    fn draw_text_layers(&self, img: &mut RgbImage, layout: &Layout, ax: &Axes, font: &FontVec) {
        let scale = PxScale::from(self.settings.font_size);
        let title_scale = PxScale::from(self.settings.title_font_size);

        for artist in ax.artists() {
            if let Artist::Text { x, y, text, color } = artist {
                let (px, py) = layout.data_to_pixel(*x, *y);
                draw_centered(img, *color, px, py, scale, font, text);
            }
        }

        let grid_bottom = layout.y0 + layout.grid_height() as i32;
        let (_, line_h) = text_size(scale, font, "Ag");

        for (col, label) in ax.xticklabels().iter().enumerate() {
            let (px, _) = layout.data_to_pixel(col as f64, 0.0);
            let top = grid_bottom + TICK_GAP;
            let cy = top as f32 + line_h as f32 / 2.0;
            draw_centered(img, TEXT_COLOR, px, cy, scale, font, label);
        }

        for (row, label) in ax.yticklabels().iter().enumerate() {
            let (_, py) = layout.data_to_pixel(0.0, row as f64);
            let (w, h) = text_size(scale, font, label);
            let x = layout.x0 - TICK_GAP - w as i32;
            draw_text_mut(img, TEXT_COLOR, x, py as i32 - h as i32 / 2, scale, font, label);
        }

        let center_x = layout.x0 as f32 + layout.grid_width() as f32 / 2.0;
        if !ax.xlabel().is_empty() {
            let y = grid_bottom + TICK_GAP * 2 + line_h as i32;
            draw_centered(
                img,
                TEXT_COLOR,
                center_x,
                y as f32 + line_h as f32 / 2.0,
                scale,
                font,
                ax.xlabel(),
            );
        }

        if !ax.ylabel().is_empty() {
            let (w, h) = text_size(scale, font, ax.ylabel());
            let x = (layout.x0 - TICK_GAP - w as i32).max(0);
            let y = (layout.y0 - TICK_GAP - h as i32).max(0);
            draw_text_mut(img, TEXT_COLOR, x, y, scale, font, ax.ylabel());
        }

        if !ax.title().is_empty() {
            let y = self.settings.margin_top as f32 / 2.0 - TICK_GAP as f32;
            draw_centered(img, TEXT_COLOR, center_x, y.max(0.0), title_scale, font, ax.title());
        }

        if !ax.legend().is_empty() {
            let y = grid_bottom + self.settings.margin_bottom as i32;
            let mut x = layout.x0;
            for entry in ax.legend() {
                draw_filled_rect_mut(
                    img,
                    Rect::at(x, y).of_size(LEGEND_SWATCH, LEGEND_SWATCH),
                    entry.color,
                );
                draw_hollow_rect_mut(
                    img,
                    Rect::at(x, y).of_size(LEGEND_SWATCH, LEGEND_SWATCH),
                    FRAME_COLOR,
                );
                let label_x = x + LEGEND_SWATCH as i32 + 6;
                let (w, h) = text_size(scale, font, &entry.label);
                let label_y = y + LEGEND_SWATCH as i32 / 2 - h as i32 / 2;
                draw_text_mut(img, TEXT_COLOR, label_x, label_y, scale, font, &entry.label);
                x = label_x + w as i32 + 24;
            }
        }
    }
}

/// Fill one grid cell with a solid color
fn fill_cell(img: &mut RgbImage, layout: &Layout, row: usize, col: usize, color: Rgb<u8>) {
    let (x, y) = layout.cell_origin(row, col);
    draw_filled_rect_mut(
        img,
        Rect::at(x, y).of_size(layout.cell_w, layout.cell_h),
        color,
    );
}

/// Upper-left triangle from the first matrix, lower-right from the second
fn draw_split_cells(
    img: &mut RgbImage,
    layout: &Layout,
    matrices: (&ReportMatrix, &ReportMatrix),
    colormaps: (Colormap, Colormap),
    vmax: f64,
) {
    let (upper, lower) = matrices;
    let (upper_cmap, lower_cmap) = colormaps;
    let w = layout.cell_w as i32;
    let h = layout.cell_h as i32;

    for (row, col, value) in upper.cells() {
        let (x, y) = layout.cell_origin(row, col);
        let top_left = Point::new(x, y);
        let top_right = Point::new(x + w, y);
        let bottom_left = Point::new(x, y + h);
        let bottom_right = Point::new(x + w, y + h);

        draw_polygon_mut(
            img,
            &[top_left, top_right, bottom_left],
            upper_cmap.color_for(value, 0.0, vmax),
        );
        draw_polygon_mut(
            img,
            &[top_right, bottom_right, bottom_left],
            lower_cmap.color_for(lower.get(row, col), 0.0, vmax),
        );
        draw_line_segment_mut(
            img,
            (top_right.x as f32, top_right.y as f32),
            (bottom_left.x as f32, bottom_left.y as f32),
            DIVIDER_COLOR,
        );
    }
}

fn draw_centered(
    img: &mut RgbImage,
    color: Rgb<u8>,
    cx: f32,
    cy: f32,
    scale: PxScale,
    font: &FontVec,
    text: &str,
) {
    let (w, h) = text_size(scale, font, text);
    let x = cx as i32 - w as i32 / 2;
    let y = cy as i32 - h as i32 / 2;
    draw_text_mut(img, color, x, y, scale, font, text);
}
