//! Tray icon image
//!
//! The bundled `icons/tray.png` is preferred. When it cannot be read the
//! icon is drawn in memory so the app always has a tray presence.

use tauri::{image::Image, path::BaseDirectory, AppHandle, Manager};

pub const ICON_SIZE: u32 = 32;

const INK: [u8; 4] = [0, 0, 0, 255];

struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 {
            return;
        }
        let x = x as u32;
        let y = y as u32;
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: [u8; 4]) {
        for py in y..y + height {
            for px in x..x + width {
                self.set_pixel(px, py, color);
            }
        }
    }

    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32, thickness: i32, color: [u8; 4]) {
        self.fill_rect(x, y, width, thickness, color);
        self.fill_rect(x, y + height - thickness, width, thickness, color);
        self.fill_rect(x, y, thickness, height, color);
        self.fill_rect(x + width - thickness, y, thickness, height, color);
    }
}

/// Calculator outline: body, display strip and a 3x3 key grid
pub fn render_calculator_glyph() -> Image<'static> {
    let mut canvas = Canvas::new(ICON_SIZE, ICON_SIZE);
    let size = ICON_SIZE as i32;

    canvas.stroke_rect(6, 3, size - 12, size - 6, 2, INK);
    canvas.fill_rect(10, 7, size - 20, 5, INK);

    let key = 3;
    for row in 0..3 {
        for col in 0..3 {
            canvas.fill_rect(10 + col * 5, 15 + row * 4, key, key - 1, INK);
        }
    }

    Image::new_owned(canvas.pixels, ICON_SIZE, ICON_SIZE)
}

/// Load the tray image from the resource directory, or draw one
pub fn load_tray_icon(app: &AppHandle, resource: &str) -> Image<'static> {
    let loaded = app
        .path()
        .resolve(resource, BaseDirectory::Resource)
        .and_then(Image::from_path);

    match loaded {
        Ok(icon) => icon,
        Err(err) => {
            tracing::warn!("Tray icon {} unavailable ({}), drawing fallback", resource, err);
            render_calculator_glyph()
        }
    }
}
