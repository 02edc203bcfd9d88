//! Grid sampling of RGBA frames.
//!
//! Each cell is represented by the single pixel at its top-left corner;
//! there is no averaging over the cell's area.

use crate::camera::Frame;

/// Raw channels and average brightness of one sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `(r + g + b) / 3`, unrounded
    pub avg: f32,
}

/// Sample the pixel at `(x, y)`.
///
/// `x` and `y` must lie inside the frame; out-of-range coordinates are a
/// caller error and panic on the slice index.
#[inline]
pub fn sample(frame: &Frame, x: u32, y: u32) -> Sample {
    let idx = frame.offset(x, y);
    let r = frame.data[idx];
    let g = frame.data[idx + 1];
    let b = frame.data[idx + 2];
    Sample {
        r,
        g,
        b,
        avg: (r as f32 + g as f32 + b as f32) / 3.0,
    }
}

/// Green channel of the pixel at `(x, y)` in a raw RGBA buffer of the given width.
#[inline]
pub fn green_at(data: &[u8], width: u32, x: u32, y: u32) -> u8 {
    data[(y as usize * width as usize + x as usize) * Frame::BYTES_PER_PIXEL + 1]
}

/// Top-left corners of every cell, row by row, stepped by `cell_size`.
///
/// Covers `[0, width) x [0, height)`; a partial cell at the right or bottom
/// edge is still sampled at its corner. Yields nothing if `cell_size` is 0.
pub fn cell_origins(width: u32, height: u32, cell_size: u32) -> impl Iterator<Item = (u32, u32)> {
    let step = cell_size.max(1) as usize;
    let rows = if cell_size == 0 { 0 } else { height };
    (0..rows)
        .step_by(step)
        .flat_map(move |y| (0..width).step_by(step).map(move |x| (x, y)))
}

/// Number of cell columns and rows for a frame.
pub fn grid_size(width: u32, height: u32, cell_size: u32) -> (u32, u32) {
    if cell_size == 0 {
        return (0, 0);
    }
    (width.div_ceil(cell_size), height.div_ceil(cell_size))
}
