//! Dataset output: the on-disk layout and the frame saver.
//!
//! This module owns:
//! - the closed set of output formats (`ImageFormat`)
//! - the sequential image identifier and its bootstrap from disk
//! - per-format conversion and multi-format saving (`FrameSaver`)

pub mod format;
pub mod saver;

pub use format::ImageFormat;
pub use saver::{DatasetError, FrameSaver};
