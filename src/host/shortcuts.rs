//! Global shortcuts through `tauri-plugin-global-shortcut`

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

use super::dispatch;
use crate::controller::hosts::{ShortcutAction, ShortcutHost};
use crate::controller::ControllerEvent;
use crate::error::{ControllerError, Result};

pub struct TauriShortcuts {
    app: AppHandle,
    active: Vec<String>,
}

impl TauriShortcuts {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            active: Vec::new(),
        }
    }
}

impl ShortcutHost for TauriShortcuts {
    fn register(&mut self, accelerator: &str, action: ShortcutAction) -> Result<()> {
        self.app
            .global_shortcut()
            .on_shortcut(accelerator, move |app, _shortcut, event| {
                if event.state() == ShortcutState::Pressed {
                    dispatch(app, ControllerEvent::Shortcut(action));
                }
            })
            .map_err(|err| ControllerError::Shortcut {
                accelerator: accelerator.to_string(),
                reason: err.to_string(),
            })?;
        self.active.push(accelerator.to_string());
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<()> {
        let count = self.active.len();
        self.active.clear();
        self.app
            .global_shortcut()
            .unregister_all()
            .map_err(|err| ControllerError::Shortcut {
                accelerator: format!("{count} registered shortcut(s)"),
                reason: err.to_string(),
            })
    }

    fn active(&self) -> usize {
        self.active.len()
    }
}
