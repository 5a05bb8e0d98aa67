//! Collaborators the controller drives
//!
//! Each trait is a thin slice of what the host platform offers. Production
//! implementations live in `crate::host` and `crate::tray`; tests use the
//! fakes in `controller::testing`.

use crate::config::ContentVariant;
use crate::error::Result;

/// Rectangle in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Point in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Everything fixed at window construction time
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub variant: ContentVariant,
    pub url: String,
    pub width: f64,
    pub height: f64,
    pub transparent: bool,
    pub background_throttling: bool,
}

pub trait PopupWindow: Send {
    fn show(&self) -> Result<()>;
    fn hide(&self) -> Result<()>;
    fn focus(&self) -> Result<()>;
    fn destroy(&self) -> Result<()>;
    fn bounds(&self) -> Result<Bounds>;
    fn set_position(&self, position: Point) -> Result<()>;
    /// Host's own placement, used when there is nothing to anchor to
    fn place_default(&self) -> Result<()>;
    fn restore(&self) -> Result<()>;
    fn is_visible(&self) -> bool;
    fn is_minimized(&self) -> bool;
    fn is_destroyed(&self) -> bool;

    fn is_devtools_open(&self) -> bool {
        false
    }
}

pub trait WindowHost: Send {
    /// Create a new, hidden popup window
    fn create(&mut self, spec: &WindowSpec) -> Result<Box<dyn PopupWindow>>;
}

pub trait TrayHost: Send {
    /// Screen bounds of the tray icon, if the platform reports them
    fn bounds(&self) -> Option<Bounds>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Toggle,
    Hide,
}

pub trait ShortcutHost: Send {
    fn register(&mut self, accelerator: &str, action: ShortcutAction) -> Result<()>;
    /// Drop every registration, even if the host reports an error
    fn unregister_all(&mut self) -> Result<()>;
    fn active(&self) -> usize;
}
