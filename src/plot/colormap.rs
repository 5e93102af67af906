//! Sequential colormaps for heatmap cells

use image::Rgb;

// ColorBrewer 9-class sequential ramps, light to dark
const OR_RD: [[u8; 3]; 9] = [
    [255, 247, 236],
    [254, 232, 200],
    [253, 212, 158],
    [253, 187, 132],
    [252, 141, 89],
    [239, 101, 72],
    [215, 48, 31],
    [179, 0, 0],
    [127, 0, 0],
];

const BLUES: [[u8; 3]; 9] = [
    [247, 251, 255],
    [222, 235, 247],
    [198, 219, 239],
    [158, 202, 225],
    [107, 174, 214],
    [66, 146, 198],
    [33, 113, 181],
    [8, 81, 156],
    [8, 48, 107],
];

const ORANGES: [[u8; 3]; 9] = [
    [255, 245, 235],
    [254, 230, 206],
    [253, 208, 162],
    [253, 174, 107],
    [253, 141, 60],
    [241, 105, 19],
    [217, 72, 1],
    [166, 54, 3],
    [127, 39, 4],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Default heatmap for single reports
    #[default]
    OrRd,
    Blues,
    Oranges,
}

impl Colormap {
    fn stops(&self) -> &'static [[u8; 3]; 9] {
        match self {
            Colormap::OrRd => &OR_RD,
            Colormap::Blues => &BLUES,
            Colormap::Oranges => &ORANGES,
        }
    }

    /// Color for a normalized position; `t` is clamped to 0..1
    pub fn color(&self, t: f64) -> Rgb<u8> {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f64;

        let a = stops[lower];
        let b = stops[lower + 1];
        let lerp = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * frac).round() as u8;
        Rgb([lerp(0), lerp(1), lerp(2)])
    }

    /// Color for a raw value on a fixed `vmin..vmax` scale
    pub fn color_for(&self, value: f64, vmin: f64, vmax: f64) -> Rgb<u8> {
        let span = vmax - vmin;
        let t = if span > 0.0 { (value - vmin) / span } else { 0.0 };
        self.color(t)
    }
}
