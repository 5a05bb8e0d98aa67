//! In-memory hosts for driving the controller in tests

use std::sync::{Arc, Mutex};

use super::hosts::{
    Bounds, Point, PopupWindow, ShortcutAction, ShortcutHost, TrayHost, WindowHost, WindowSpec,
};
use super::{Collaborators, VisibilityController};
use crate::config::AppConfig;
use crate::error::{ControllerError, Result};
use crate::login::LoginItemHost;
use crate::storage::{MemoryStore, Settings};

const DEFAULT_PLACEMENT: Point = Point { x: 40.0, y: 40.0 };

#[derive(Debug)]
struct WindowRecord {
    spec: WindowSpec,
    position: Point,
    visible: bool,
    focused: bool,
    minimized: bool,
    destroyed: bool,
    devtools_open: bool,
    refuse_destroy: bool,
    size_unavailable: bool,
    hide_calls: usize,
    default_placements: usize,
}

/// Test-side view of a window the controller created
#[derive(Clone)]
pub struct FakeWindowHandle(Arc<Mutex<WindowRecord>>);

impl FakeWindowHandle {
    fn with<T>(&self, f: impl FnOnce(&mut WindowRecord) -> T) -> T {
        f(&mut self.0.lock().unwrap())
    }

    pub fn spec(&self) -> WindowSpec {
        self.with(|w| w.spec.clone())
    }

    pub fn bounds(&self) -> Bounds {
        self.with(|w| Bounds::new(w.position.x, w.position.y, w.spec.width, w.spec.height))
    }

    pub fn is_focused(&self) -> bool {
        self.with(|w| w.focused)
    }

    pub fn is_minimized(&self) -> bool {
        self.with(|w| w.minimized)
    }

    pub fn is_destroyed(&self) -> bool {
        self.with(|w| w.destroyed)
    }

    pub fn hide_calls(&self) -> usize {
        self.with(|w| w.hide_calls)
    }

    pub fn default_placements(&self) -> usize {
        self.with(|w| w.default_placements)
    }

    pub fn minimize(&self) {
        self.with(|w| {
            w.minimized = true;
            w.focused = false;
        })
    }

    pub fn set_devtools_open(&self, open: bool) {
        self.with(|w| w.devtools_open = open)
    }

    /// Make `destroy` fail while the window stays alive
    pub fn refuse_destroy(&self) {
        self.with(|w| w.refuse_destroy = true)
    }

    /// Make the host unable to report the window's size
    pub fn make_size_unavailable(&self) {
        self.with(|w| w.size_unavailable = true)
    }

    /// Simulate the host tearing the window down behind the controller
    pub fn destroy_externally(&self) {
        self.with(|w| {
            w.destroyed = true;
            w.visible = false;
        })
    }
}

struct FakeWindow(FakeWindowHandle);

impl FakeWindow {
    fn live<T>(&self, f: impl FnOnce(&mut WindowRecord) -> T) -> Result<T> {
        self.0.with(|w| {
            if w.destroyed {
                Err(ControllerError::Window("window destroyed".to_string()))
            } else {
                Ok(f(w))
            }
        })
    }
}

impl PopupWindow for FakeWindow {
    fn show(&self) -> Result<()> {
        self.live(|w| w.visible = true)
    }

    fn hide(&self) -> Result<()> {
        self.live(|w| {
            w.visible = false;
            w.focused = false;
            w.hide_calls += 1;
        })
    }

    fn focus(&self) -> Result<()> {
        self.live(|w| w.focused = true)
    }

    fn destroy(&self) -> Result<()> {
        self.live(|w| {
            if w.refuse_destroy {
                return Err(ControllerError::Window("destroy refused".to_string()));
            }
            w.destroyed = true;
            w.visible = false;
            Ok(())
        })?
    }

    fn bounds(&self) -> Result<Bounds> {
        self.live(|w| {
            if w.size_unavailable {
                return Err(ControllerError::Window("size unavailable".to_string()));
            }
            Ok(Bounds::new(w.position.x, w.position.y, w.spec.width, w.spec.height))
        })?
    }

    fn set_position(&self, position: Point) -> Result<()> {
        self.live(|w| w.position = position)
    }

    fn place_default(&self) -> Result<()> {
        self.live(|w| {
            w.position = DEFAULT_PLACEMENT;
            w.default_placements += 1;
        })
    }

    fn restore(&self) -> Result<()> {
        self.live(|w| w.minimized = false)
    }

    fn is_visible(&self) -> bool {
        self.0.with(|w| w.visible)
    }

    fn is_minimized(&self) -> bool {
        self.0.with(|w| w.minimized)
    }

    fn is_destroyed(&self) -> bool {
        self.0.with(|w| w.destroyed)
    }

    fn is_devtools_open(&self) -> bool {
        self.0.with(|w| w.devtools_open)
    }
}

#[derive(Clone, Default)]
pub struct FakeWindows {
    created: Arc<Mutex<Vec<FakeWindowHandle>>>,
}

impl FakeWindows {
    pub fn count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// Windows the host still has alive
    pub fn live(&self) -> usize {
        self.created
            .lock()
            .unwrap()
            .iter()
            .filter(|window| !window.is_destroyed())
            .count()
    }

    /// Most recently created window
    pub fn current(&self) -> FakeWindowHandle {
        self.created
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no window created yet")
    }
}

impl WindowHost for FakeWindows {
    fn create(&mut self, spec: &WindowSpec) -> Result<Box<dyn PopupWindow>> {
        let handle = FakeWindowHandle(Arc::new(Mutex::new(WindowRecord {
            spec: spec.clone(),
            position: Point { x: 0.0, y: 0.0 },
            visible: false,
            focused: false,
            minimized: false,
            destroyed: false,
            devtools_open: false,
            refuse_destroy: false,
            size_unavailable: false,
            hide_calls: 0,
            default_placements: 0,
        })));
        self.created.lock().unwrap().push(handle.clone());
        Ok(Box::new(FakeWindow(handle)))
    }
}

#[derive(Clone, Default)]
pub struct FakeTray {
    bounds: Arc<Mutex<Option<Bounds>>>,
}

impl FakeTray {
    pub fn set_bounds(&self, bounds: Option<Bounds>) {
        *self.bounds.lock().unwrap() = bounds;
    }
}

impl TrayHost for FakeTray {
    fn bounds(&self) -> Option<Bounds> {
        *self.bounds.lock().unwrap()
    }
}

#[derive(Clone, Default)]
pub struct FakeShortcuts {
    registered: Arc<Mutex<Vec<(String, ShortcutAction)>>>,
    rejected: Arc<Mutex<Vec<String>>>,
}

impl FakeShortcuts {
    /// Make the host refuse this accelerator, as if another app owns it
    pub fn reject(&self, accelerator: &str) {
        self.rejected.lock().unwrap().push(accelerator.to_string());
    }

    /// The action the host would fire for this key press
    pub fn press(&self, accelerator: &str) -> Option<ShortcutAction> {
        self.registered
            .lock()
            .unwrap()
            .iter()
            .find(|(registered, _)| registered == accelerator)
            .map(|(_, action)| *action)
    }
}

impl ShortcutHost for FakeShortcuts {
    fn register(&mut self, accelerator: &str, action: ShortcutAction) -> Result<()> {
        if self.rejected.lock().unwrap().iter().any(|a| a == accelerator) {
            return Err(ControllerError::Shortcut {
                accelerator: accelerator.to_string(),
                reason: "already registered by another application".to_string(),
            });
        }
        self.registered
            .lock()
            .unwrap()
            .push((accelerator.to_string(), action));
        Ok(())
    }

    fn unregister_all(&mut self) -> Result<()> {
        self.registered.lock().unwrap().clear();
        Ok(())
    }

    fn active(&self) -> usize {
        self.registered.lock().unwrap().len()
    }
}

#[derive(Clone, Default)]
pub struct FakeLoginItems {
    enabled: Arc<Mutex<bool>>,
}

impl FakeLoginItems {
    pub fn enabled(&self) -> bool {
        *self.enabled.lock().unwrap()
    }
}

impl LoginItemHost for FakeLoginItems {
    fn is_enabled(&self) -> Result<bool> {
        Ok(self.enabled())
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        *self.enabled.lock().unwrap() = enabled;
        Ok(())
    }
}

pub struct Harness {
    pub controller: VisibilityController,
    pub windows: FakeWindows,
    pub tray: FakeTray,
    pub shortcuts: FakeShortcuts,
    pub login_items: FakeLoginItems,
    pub store: MemoryStore,
}

pub fn harness(config: AppConfig) -> Harness {
    let windows = FakeWindows::default();
    let tray = FakeTray::default();
    let shortcuts = FakeShortcuts::default();
    let login_items = FakeLoginItems::default();
    let store = MemoryStore::default();

    let controller = VisibilityController::new(
        config,
        Collaborators {
            windows: Box::new(windows.clone()),
            tray: Box::new(tray.clone()),
            shortcuts: Box::new(shortcuts.clone()),
            login_items: Box::new(login_items.clone()),
            settings: Settings::new(Box::new(store.clone())),
        },
    );

    Harness {
        controller,
        windows,
        tray,
        shortcuts,
        login_items,
        store,
    }
}
