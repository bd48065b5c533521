//! Screen capture for the configured region of the primary monitor.
//!
//! This module provides:
//! - Capture-region geometry (`CaptureRegion`)
//! - Single-frame region capture (`capture_frame`)

pub mod screen;

pub use screen::{capture_frame, CaptureRegion};
