//! Single-frame region capture using xcap.

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, RgbImage};
use xcap::Monitor;

use crate::config::CaptureConfig;

/// The fixed screen rectangle sampled on every preview iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Derives the capture rectangle from the configured geometry: a square of
    /// side `capture_height`, horizontally centered in `capture_width` and
    /// shifted down from the top of the screen by `capture_offset`.
    pub fn from_config(config: &CaptureConfig) -> Self {
        let side = config.capture_height;

        Self {
            x: (config.capture_width / 2).saturating_sub(side / 2),
            y: config.capture_offset,
            width: side,
            height: side,
        }
    }
}

/// Grabs one still frame of the region from the primary monitor.
///
/// The RGBA capture is reduced to RGB at this boundary so everything
/// downstream works on 3-channel frames.
pub fn capture_frame(region: &CaptureRegion) -> Result<RgbImage> {
    let monitor = primary_monitor()?;

    let rgba = monitor
        .capture_region(region.x, region.y, region.width, region.height)
        .with_context(|| {
            format!(
                "Failed to capture {}x{} region at ({}, {})",
                region.width, region.height, region.x, region.y
            )
        })?;

    Ok(DynamicImage::ImageRgba8(rgba).to_rgb8())
}

/// Returns the primary monitor, or the first one when no monitor reports
/// itself as primary.
fn primary_monitor() -> Result<Monitor> {
    let mut monitors = Monitor::all().context("Failed to enumerate monitors")?;

    let index = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);
    if index >= monitors.len() {
        return Err(anyhow!("No monitors found"));
    }

    Ok(monitors.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_centered_square() {
        let config = CaptureConfig::default();
        let region = CaptureRegion::from_config(&config);

        assert_eq!(
            region,
            CaptureRegion {
                x: 280,
                y: 30,
                width: 720,
                height: 720,
            }
        );
    }

    #[test]
    fn test_region_clamps_at_left_edge() {
        let config = CaptureConfig {
            capture_width: 100,
            capture_height: 300,
            ..Default::default()
        };
        let region = CaptureRegion::from_config(&config);

        assert_eq!(region.x, 0);
        assert_eq!(region.width, 300);
    }
}
