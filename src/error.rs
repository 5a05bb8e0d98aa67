//! Error type shared by the controller and its host adapters

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Window host error: {0}")]
    Window(String),
    #[error("Failed to register shortcut {accelerator}: {reason}")]
    Shortcut { accelerator: String, reason: String },
    #[error("Settings store error: {0}")]
    Settings(String),
    #[error("Login item error: {0}")]
    LoginItem(String),
}

impl From<tauri::Error> for ControllerError {
    fn from(err: tauri::Error) -> Self {
        ControllerError::Window(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ControllerError>;
