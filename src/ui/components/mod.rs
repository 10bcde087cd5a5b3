//! UI components for Vera

mod input_bar;
mod message_list;
mod voice_overlay;

pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use voice_overlay::{OverlayResponse, VoiceOverlay};
