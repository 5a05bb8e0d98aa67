//! Popup placement relative to the tray icon

use super::hosts::{Bounds, Point};

/// Gap between the tray icon's bottom edge and the popup
pub const TRAY_MARGIN: f64 = 4.0;

/// Center `window` horizontally under `tray`, `TRAY_MARGIN` below it
pub fn anchor_below(tray: Bounds, window: Bounds) -> Point {
    Point {
        x: (tray.center_x() - window.width / 2.0).round(),
        y: tray.bottom() + TRAY_MARGIN,
    }
}
