//! Rasterization of a scalar grid into an RGBA overlay.

use grid_pipeline::{AxisOrientation, ScalarGrid};
use rayon::prelude::*;

use crate::colorscale::ColorScale;

/// An RGBA overlay image with components in [0, 1].
///
/// Rows run north to south regardless of the source grid's latitude
/// orientation, so the image drops straight onto a map with its bounding
/// box. Alpha is 0 exactly where the source cell was missing.
#[derive(Debug, Clone)]
pub struct OverlayImage {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl OverlayImage {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved RGBA components, row-major from the top-left.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// The RGBA quadruple at (row, col).
    pub fn pixel(&self, row: usize, col: usize) -> Option<[f32; 4]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let i = (row * self.width + col) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Convert to 8-bit RGBA for encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }
}

/// Normalize a value into [0, 1] by clamping to [vmin, vmax] then scaling.
///
/// `v <= vmin` maps to 0 and `v >= vmax` maps to 1. A degenerate range
/// splits at the threshold rather than dividing by zero.
pub fn normalize(value: f32, vmin: f32, vmax: f32) -> f32 {
    if !(vmax > vmin) {
        return if value >= vmax { 1.0 } else { 0.0 };
    }
    ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
}

/// Rasterize a grid through a normalization range and color scale.
///
/// Valid cells get the scale color with alpha 1; missing cells are fully
/// transparent whatever the scale would have produced.
pub fn rasterize(grid: &ScalarGrid, vmin: f32, vmax: f32, scale: &ColorScale) -> OverlayImage {
    let (height, width) = grid.shape();
    let flip_rows = AxisOrientation::of(grid.lat()) == AxisOrientation::Ascending;

    let mut pixels = vec![0.0f32; width * height * 4];
    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(out_row, row_pixels)| {
            let src_row = if flip_rows {
                height - 1 - out_row
            } else {
                out_row
            };
            for col in 0..width {
                let value = grid.get(src_row, col).unwrap_or(f32::NAN);
                if value.is_nan() {
                    continue; // stays transparent
                }
                let [r, g, b] = scale.sample(normalize(value, vmin, vmax));
                let i = col * 4;
                row_pixels[i] = r as f32 / 255.0;
                row_pixels[i + 1] = g as f32 / 255.0;
                row_pixels[i + 2] = b as f32 / 255.0;
                row_pixels[i + 3] = 1.0;
            }
        });

    OverlayImage {
        width,
        height,
        pixels,
    }
}
