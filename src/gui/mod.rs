//! Live preview window.
//!
//! Renders the capture region continuously and handles the two control keys:
//! `.` saves the displayed frame through the `FrameSaver`, `c` closes the
//! window and ends the run.

pub mod state;

use std::time::Instant;

use eframe::egui::{self, Color32, TextureHandle, Vec2};
use image::RgbImage;

use crate::capture::{self, CaptureRegion};
use crate::dataset::FrameSaver;

use state::{PreviewState, SaveStatus};

/// Key that saves the currently displayed frame.
const SAVE_KEY: egui::Key = egui::Key::Period;
/// Key that closes the preview and terminates the run.
const QUIT_KEY: egui::Key = egui::Key::C;

/// Main preview application struct.
pub struct PreviewApp {
    /// Owns the identifier sequence and the multi-format save.
    saver: FrameSaver,
    /// Screen rectangle grabbed on every repaint.
    region: CaptureRegion,
    /// Texture holding the most recent capture.
    texture: Option<TextureHandle>,
    /// Frame behind the texture; this is what a save persists.
    frame: Option<RgbImage>,
    /// Display state for the status line.
    state: PreviewState,
}

impl PreviewApp {
    pub fn new(region: CaptureRegion, saver: FrameSaver) -> Self {
        Self {
            saver,
            region,
            texture: None,
            frame: None,
            state: PreviewState::default(),
        }
    }

    /// Captures one frame and uploads it as the preview texture.
    ///
    /// On capture failure the previous texture stays up and the next repaint
    /// retries; the failure is logged and shown in the status line.
    fn refresh_frame(&mut self, ctx: &egui::Context) {
        let started = Instant::now();

        match capture::capture_frame(&self.region) {
            Ok(frame) => {
                self.state.last_capture_time = Some(started.elapsed());
                self.state.frames_captured += 1;
                self.state.capture_error = None;

                let size = [frame.width() as usize, frame.height() as usize];
                let color_image = egui::ColorImage::from_rgb(size, frame.as_raw());
                match &mut self.texture {
                    Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                    None => {
                        self.texture = Some(ctx.load_texture(
                            "preview",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                self.frame = Some(frame);
            }
            Err(e) => {
                crate::log(&format!("Capture failed: {:#}", e));
                self.state.capture_error = Some(e.to_string());
            }
        }
    }

    /// Saves the currently displayed frame in every active format.
    fn handle_save(&mut self) {
        let Some(frame) = &self.frame else {
            self.state.save_status = SaveStatus::Error("no frame captured yet".to_string());
            return;
        };

        let id = self.saver.next_id();
        match self.saver.save_next_frame(frame) {
            Ok(()) => {
                crate::log(&format!(
                    "Saved frame {} as [{}]",
                    id,
                    self.format_names().join(", ")
                ));
                self.state.save_status = SaveStatus::Saved(id);
            }
            Err(e) => {
                crate::log(&format!("Save failed: {}", e));
                self.state.save_status = SaveStatus::Error(e.to_string());
            }
        }
    }

    fn format_names(&self) -> Vec<&'static str> {
        self.saver
            .active_formats()
            .iter()
            .map(|f| f.dir_name())
            .collect()
    }

    /// Renders the one-line status readout above the image.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("frame {}", self.state.frames_captured));
            ui.separator();
            ui.label(format!("next id: {}", self.saver.next_id()));
            ui.separator();
            ui.label(format!("formats: {}", self.format_names().join("/")));
            ui.separator();

            if let Some(err) = &self.state.capture_error {
                ui.colored_label(Color32::from_rgb(200, 0, 0), format!("capture: {}", err));
            } else if let Some(elapsed) = self.state.last_capture_time {
                ui.label(format!("capture: {} ms", elapsed.as_millis()));
            }

            ui.separator();
            let status_color = if self.state.save_status.is_error() {
                Color32::from_rgb(200, 0, 0)
            } else {
                Color32::from_rgb(0, 150, 0)
            };
            ui.colored_label(status_color, self.state.save_status.status_text());

            ui.separator();
            ui.label("[.] save  [c] quit");
        });
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_frame(ctx);

        if ctx.input(|i| i.key_pressed(SAVE_KEY)) {
            self.handle_save();
        }
        if ctx.input(|i| i.key_pressed(QUIT_KEY)) {
            crate::log("Quit key pressed, closing preview");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_status(ui);
            ui.separator();

            if let Some(texture) = &self.texture {
                ui.image((texture.id(), texture.size_vec2()));
            } else {
                ui.label("Waiting for first frame...");
            }
        });

        // Live feed: repaint immediately rather than waiting for input events
        ctx.request_repaint();
    }
}

/// Run the preview window.
/// This function blocks until the window is closed.
pub fn run_preview(region: CaptureRegion, saver: FrameSaver) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(
                region.width as f32 + 16.0,
                region.height as f32 + 48.0,
            ))
            .with_title("Dataset Capture"),
        ..Default::default()
    };

    crate::log("Preview: press '.' to save the current frame, 'c' to quit");

    eframe::run_native(
        "Dataset Capture",
        options,
        Box::new(move |_cc| Ok(Box::new(PreviewApp::new(region, saver)))),
    )
}
