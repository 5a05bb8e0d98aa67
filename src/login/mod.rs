//! Start-at-login registration

use tauri::{AppHandle, Manager};
use tauri_plugin_autostart::AutoLaunchManager;

use crate::error::{ControllerError, Result};

pub trait LoginItemHost: Send {
    fn is_enabled(&self) -> Result<bool>;
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

/// Login item backed by `tauri-plugin-autostart`, which registers the
/// running executable's path
pub struct AutostartLoginItems {
    app: AppHandle,
}

impl AutostartLoginItems {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl LoginItemHost for AutostartLoginItems {
    fn is_enabled(&self) -> Result<bool> {
        let autostart_manager = self.app.state::<AutoLaunchManager>();
        autostart_manager
            .is_enabled()
            .map_err(|e| ControllerError::LoginItem(format!("Failed to check autostart status: {}", e)))
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        let autostart_manager = self.app.state::<AutoLaunchManager>();

        if enabled {
            autostart_manager
                .enable()
                .map_err(|e| ControllerError::LoginItem(format!("Failed to enable autostart: {}", e)))?;
            tracing::info!("Autostart enabled");
        } else {
            autostart_manager
                .disable()
                .map_err(|e| ControllerError::LoginItem(format!("Failed to disable autostart: {}", e)))?;
            tracing::info!("Autostart disabled");
        }

        Ok(())
    }
}
