//! GUI implementation with egui/eframe
//!
//! This module provides the desktop user interface for Vera using the
//! eframe framework.

mod app;
mod components;
mod state;
mod theme;

pub use app::VeraApp;
pub use components::{InputBar, MessageList, VoiceOverlay};
pub use state::{AppState, CONNECTION_APOLOGY, TRANSCRIPT_FADE};
pub use theme::Theme;

/// Run the Vera application
pub fn run() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Vera"),
        ..Default::default()
    };

    eframe::run_native("Vera", options, Box::new(|cc| Ok(Box::new(VeraApp::new(cc)))))
}
