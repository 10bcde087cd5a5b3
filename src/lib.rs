pub mod backend;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VeraError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Recognition error: {0}")]
    RecognitionError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl VeraError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Hardware/device errors may require user intervention
            VeraError::AudioDeviceError(_) => false,
            // Model errors require restarting
            VeraError::ModelLoadError(_) => false,
            // Typically transient
            VeraError::RecognitionError(_) => true,
            VeraError::BackendError(_) => true,
            VeraError::AudioProcessingError(_) => true,
            VeraError::ConfigError(_) => false,
            VeraError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            VeraError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            VeraError::ModelLoadError(_) => {
                "Failed to load the speech model. Please verify model files are present.".to_string()
            }
            VeraError::RecognitionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            VeraError::BackendError(_) => {
                "Sorry, I'm having trouble connecting. Please try again later.".to_string()
            }
            VeraError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            VeraError::ConfigError(_) => "Configuration error. Please check settings.".to_string(),
            VeraError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VeraError>;
