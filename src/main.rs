//! Dataset Capture Tool
//!
//! Continuously captures a fixed region of the primary monitor, shows it in a
//! live preview window, and saves the displayed frame in every active output
//! format (raw RGB and Canny edge map) on keypress. Saved files are numbered
//! sequentially so a dataset can be grown across runs.

mod capture;
mod config;
mod dataset;
mod edge;
mod gui;
mod paths;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

use capture::CaptureRegion;
use config::CaptureConfig;
use dataset::FrameSaver;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("dataset_capture.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join("dataset_capture.log");
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    paths::ensure_directories().context("Failed to create logs directory")?;

    let config = CaptureConfig::load();
    let region = CaptureRegion::from_config(&config);
    log(&format!(
        "Capture region: {}x{} at ({}, {})",
        region.width, region.height, region.x, region.y
    ));
    log(&format!(
        "Configured save size: {}x{} (images are saved at capture resolution)",
        config.save_width, config.save_height
    ));

    let saver = FrameSaver::new(&config).with_context(|| {
        format!(
            "Failed to open dataset at {}",
            paths::resolve_images_root(&config.images_root).display()
        )
    })?;
    log(&format!(
        "Dataset opened: formats [{}], next id {}",
        saver
            .active_formats()
            .iter()
            .map(|f| f.dir_name())
            .collect::<Vec<_>>()
            .join(", "),
        saver.next_id()
    ));

    gui::run_preview(region, saver).map_err(|e| anyhow!("Preview error: {}", e))?;

    log("Preview closed, exiting");
    Ok(())
}
