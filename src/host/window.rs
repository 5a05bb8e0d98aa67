//! Popup window backed by a Tauri webview window

use tauri::utils::config::BackgroundThrottlingPolicy;
use tauri::{AppHandle, LogicalPosition, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_positioner::{Position, WindowExt};
use url::Url;

use crate::controller::hosts::{Bounds, Point, PopupWindow, WindowHost, WindowSpec};
use crate::error::Result;

/// Label prefix of every popup window; a generation number is appended
/// because a destroyed label may linger until the host processes it
pub const POPUP_LABEL_PREFIX: &str = "popup";

pub fn is_popup_label(label: &str) -> bool {
    label.starts_with(POPUP_LABEL_PREFIX)
}

pub struct TauriWindowHost {
    app: AppHandle,
    generation: u32,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app, generation: 0 }
    }
}

impl WindowHost for TauriWindowHost {
    fn create(&mut self, spec: &WindowSpec) -> Result<Box<dyn PopupWindow>> {
        self.generation += 1;
        let label = format!("{POPUP_LABEL_PREFIX}-{}", self.generation);

        let url = match Url::parse(&spec.url) {
            Ok(url) => WebviewUrl::External(url),
            Err(err) => {
                tracing::warn!("Invalid calculator URL {:?}: {}", spec.url, err);
                WebviewUrl::App("index.html".into())
            }
        };

        let throttling = if spec.background_throttling {
            BackgroundThrottlingPolicy::Throttle
        } else {
            BackgroundThrottlingPolicy::Disabled
        };

        let window = WebviewWindowBuilder::new(&self.app, &label, url)
            .title("Calcbar")
            .inner_size(spec.width, spec.height)
            .resizable(false)
            .maximizable(false)
            .minimizable(false)
            .visible(false)
            .decorations(false)
            .always_on_top(true)
            .visible_on_all_workspaces(true)
            .skip_taskbar(true)
            .transparent(spec.transparent)
            .shadow(!spec.transparent)
            .background_throttling(throttling)
            .build()?;

        tracing::debug!("Built {} -> {}", label, spec.url);
        Ok(Box::new(TauriPopup {
            app: self.app.clone(),
            label,
            window,
        }))
    }
}

pub struct TauriPopup {
    app: AppHandle,
    label: String,
    window: WebviewWindow,
}

impl PopupWindow for TauriPopup {
    fn show(&self) -> Result<()> {
        Ok(self.window.show()?)
    }

    fn hide(&self) -> Result<()> {
        Ok(self.window.hide()?)
    }

    fn focus(&self) -> Result<()> {
        Ok(self.window.set_focus()?)
    }

    fn destroy(&self) -> Result<()> {
        Ok(self.window.destroy()?)
    }

    fn bounds(&self) -> Result<Bounds> {
        let scale = self.window.scale_factor()?;
        let position = self.window.outer_position()?.to_logical::<f64>(scale);
        let size = self.window.outer_size()?.to_logical::<f64>(scale);
        Ok(Bounds::new(position.x, position.y, size.width, size.height))
    }

    fn set_position(&self, position: Point) -> Result<()> {
        Ok(self
            .window
            .set_position(LogicalPosition::new(position.x, position.y))?)
    }

    fn place_default(&self) -> Result<()> {
        Ok(self.window.as_ref().window().move_window(Position::TopRight)?)
    }

    fn restore(&self) -> Result<()> {
        Ok(self.window.unminimize()?)
    }

    fn is_visible(&self) -> bool {
        self.window.is_visible().unwrap_or(false)
    }

    fn is_minimized(&self) -> bool {
        self.window.is_minimized().unwrap_or(false)
    }

    fn is_destroyed(&self) -> bool {
        self.app.get_webview_window(&self.label).is_none()
    }

    fn is_devtools_open(&self) -> bool {
        self.window.is_devtools_open()
    }
}

#[cfg(test)]
mod tests {
    use super::is_popup_label;

    #[test]
    fn popup_labels_match_every_generation() {
        assert!(is_popup_label("popup-1"));
        assert!(is_popup_label("popup-12"));
        assert!(!is_popup_label("settings"));
    }
}
