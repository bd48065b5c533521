//! Canny edge detection over RGB frames.
//!
//! Pipeline: grayscale intensity map, Sobel gradient pair, non-maximum
//! suppression along the quantized gradient direction, then double-threshold
//! hysteresis. Output pixels are strictly 0 or 255.

use image::{GrayImage, RgbImage};

/// BT.601 luma weights, matching the grayscale conversion the capture
/// pipeline's source material was tuned against.
const R_LUMA: f32 = 0.299;
const G_LUMA: f32 = 0.587;
const B_LUMA: f32 = 0.114;

/// Detects edges in an RGB frame.
///
/// The two thresholds are order-independent: the smaller acts as the weak-edge
/// cutoff, the larger as the strong-edge cutoff. Weak pixels survive only when
/// 8-connected to a strong pixel.
pub fn canny(frame: &RgbImage, threshold1: f32, threshold2: f32) -> GrayImage {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let low = threshold1.min(threshold2);
    let high = threshold1.max(threshold2);

    // Sobel needs a 1-pixel border on each side
    if w < 3 || h < 3 {
        return GrayImage::new(frame.width(), frame.height());
    }

    let intensity = intensity_map(frame);
    let (gx, gy) = sobel(&intensity, w, h);

    let mut magnitude = vec![0.0f32; w * h];
    let mut angle = vec![0.0f32; w * h];
    for i in 0..magnitude.len() {
        magnitude[i] = (gx[i] * gx[i] + gy[i] * gy[i]).sqrt();
        angle[i] = gy[i].atan2(gx[i]);
    }

    let thinned = non_maximum_suppression(&magnitude, &angle, w, h);
    let edges = hysteresis(&thinned, w, h, low, high);

    GrayImage::from_raw(frame.width(), frame.height(), edges)
        .unwrap_or_else(|| GrayImage::new(frame.width(), frame.height()))
}

/// Extracts grayscale intensity values from an RGB frame.
fn intensity_map(frame: &RgbImage) -> Vec<f32> {
    let mut intensity = Vec::with_capacity((frame.width() * frame.height()) as usize);

    for pixel in frame.pixels() {
        let [r, g, b] = pixel.0;
        intensity.push(R_LUMA * r as f32 + G_LUMA * g as f32 + B_LUMA * b as f32);
    }

    intensity
}

/// Applies the Sobel operator to the intensity map.
///
/// The Sobel kernels are defined as follows:
/// - `Gx = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]`
/// - `Gy = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]]`
fn sobel(intensity: &[f32], w: usize, h: usize) -> (Vec<f32>, Vec<f32>) {
    let mut gx = vec![0.0; w * h];
    let mut gy = vec![0.0; w * h];

    for y in 1..(h - 1) {
        for x in 1..(w - 1) {
            let i = y * w + x;

            gx[i] = -1.0 * intensity[(y - 1) * w + (x - 1)]
                + 1.0 * intensity[(y - 1) * w + (x + 1)]
                + -2.0 * intensity[y * w + (x - 1)]
                + 2.0 * intensity[y * w + (x + 1)]
                + -1.0 * intensity[(y + 1) * w + (x - 1)]
                + 1.0 * intensity[(y + 1) * w + (x + 1)];

            gy[i] = -1.0 * intensity[(y - 1) * w + (x - 1)]
                + -2.0 * intensity[(y - 1) * w + x]
                + -1.0 * intensity[(y - 1) * w + (x + 1)]
                + 1.0 * intensity[(y + 1) * w + (x - 1)]
                + 2.0 * intensity[(y + 1) * w + x]
                + 1.0 * intensity[(y + 1) * w + (x + 1)];
        }
    }

    (gx, gy)
}

/// Thins edges to single-pixel width by keeping only pixels that are local
/// maxima along their gradient direction.
fn non_maximum_suppression(magnitude: &[f32], angle: &[f32], w: usize, h: usize) -> Vec<f32> {
    let mut result = vec![0.0; w * h];

    for y in 1..(h - 1) {
        for x in 1..(w - 1) {
            let i = y * w + x;

            if magnitude[i] == 0.0 {
                continue;
            }

            // normalize to 0-180 degrees
            let angle_deg = (angle[i].to_degrees() + 180.0) % 180.0;

            let (nx1, ny1, nx2, ny2) = if (0.0..22.5).contains(&angle_deg)
                || (157.5..180.0).contains(&angle_deg)
            {
                // horizontal edge
                (x + 1, y, x - 1, y)
            } else if (22.5..67.5).contains(&angle_deg) {
                // forward edge (/)
                (x + 1, y - 1, x - 1, y + 1)
            } else if (67.5..112.5).contains(&angle_deg) {
                // vertical edge
                (x, y - 1, x, y + 1)
            } else {
                // back edge (\)
                (x - 1, y - 1, x + 1, y + 1)
            };

            let n1 = magnitude[ny1 * w + nx1];
            let n2 = magnitude[ny2 * w + nx2];

            // Keep only local maxima
            if magnitude[i] >= n1 && magnitude[i] >= n2 {
                result[i] = magnitude[i];
            }
        }
    }

    result
}

/// Double threshold plus edge tracking: pixels at or above `high` are edges,
/// pixels at or above `low` become edges only when 8-connected to one.
fn hysteresis(magnitude: &[f32], w: usize, h: usize, low: f32, high: f32) -> Vec<u8> {
    let mut edges = vec![0u8; w * h];
    let mut stack = Vec::new();

    for i in 0..magnitude.len() {
        if magnitude[i] >= high {
            edges[i] = 255;
            stack.push(i);
        }
    }

    // Grow strong edges into adjacent weak pixels
    while let Some(i) = stack.pop() {
        let x = (i % w) as isize;
        let y = (i / w) as isize;

        for dy in -1..=1isize {
            for dx in -1..=1isize {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if edges[j] == 0 && magnitude[j] >= low {
                    edges[j] = 255;
                    stack.push(j);
                }
            }
        }
    }

    edges
}
