//! Preview application state.
//!
//! Tracks capture timing and the outcome of the most recent save for display
//! in the status line.

use std::time::Duration;

/// Outcome of the most recent save attempt.
#[derive(Clone, Debug, Default)]
pub enum SaveStatus {
    /// Nothing saved yet this run
    #[default]
    Idle,
    /// Last save completed; holds the identifier it was stored under
    Saved(u64),
    /// Last save failed
    Error(String),
}

impl SaveStatus {
    /// Get display text for the status line.
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "no frames saved yet".to_string(),
            Self::Saved(id) => format!("saved frame {}", id),
            Self::Error(msg) => format!("save failed: {}", msg),
        }
    }

    /// Check if the last save attempt failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Preview loop state between repaints.
#[derive(Debug, Default)]
pub struct PreviewState {
    /// Frames captured since startup.
    pub frames_captured: u64,
    /// Wall time the most recent screen grab took.
    pub last_capture_time: Option<Duration>,
    /// Failure message when the last grab did not produce a frame.
    pub capture_error: Option<String>,
    /// Outcome of the most recent save attempt.
    pub save_status: SaveStatus,
}
