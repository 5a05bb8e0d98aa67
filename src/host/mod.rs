//! Tauri side of the controller: adapters and event dispatch

pub mod shortcuts;
pub mod window;

use std::sync::{Mutex, TryLockError};

use tauri::{AppHandle, Manager, WindowEvent};

use crate::controller::{ControllerEvent, Flow, VisibilityController};
use crate::menu::MenuState;
use crate::tray::TrayMenu;

pub use shortcuts::TauriShortcuts;
pub use window::{is_popup_label, TauriWindowHost};

/// Managed state holding the one controller. Tauri requires managed state to
/// be `Sync`; every lock is taken on the main thread so it never contends.
pub struct ControllerState(pub Mutex<VisibilityController>);

/// Hand an event to the controller on the main thread.
///
/// Host callbacks (shortcuts, menus, second launches) arrive on arbitrary
/// threads; funneling them through the event loop keeps controller calls
/// strictly sequential.
pub fn dispatch(app: &AppHandle, event: ControllerEvent) {
    let handle = app.clone();
    let result = app.run_on_main_thread(move || {
        let Some(state) = handle.try_state::<ControllerState>() else {
            tracing::debug!("Controller not ready, dropping {:?}", event);
            return;
        };

        // `run_on_main_thread` runs inline when already on the main thread,
        // so an event raised by a host call made under the lock re-enters
        // here and gets dropped.
        let Some((flow, menu_state)) = handle_event(&state.0, event) else {
            return;
        };

        if let (Some(menu_state), Some(menu)) = (menu_state, handle.try_state::<TrayMenu>()) {
            menu.apply(&menu_state);
        }
        if flow == Flow::Exit {
            handle.exit(0);
        }
    });

    if let Err(err) = result {
        tracing::error!("Failed to dispatch controller event: {}", err);
    }
}

/// Run one event against the controller if the lock is free. Returns the
/// flow and, after a menu command, the menu state to show.
fn handle_event(
    state: &Mutex<VisibilityController>,
    event: ControllerEvent,
) -> Option<(Flow, Option<MenuState>)> {
    let mut controller = match state.try_lock() {
        Ok(controller) => controller,
        Err(TryLockError::WouldBlock) => {
            tracing::debug!("Controller busy, dropping re-entrant {:?}", event);
            return None;
        }
        Err(TryLockError::Poisoned(_)) => {
            tracing::error!("Controller lock poisoned, dropping {:?}", event);
            return None;
        }
    };
    let flow = controller.handle(event);
    let menu_state = matches!(event, ControllerEvent::Menu(_)).then(|| controller.menu_state());
    Some((flow, menu_state))
}

/// Controller event for a window event, if it concerns the popup
pub fn popup_event(label: &str, event: &WindowEvent) -> Option<ControllerEvent> {
    if !is_popup_label(label) {
        return None;
    }
    match event {
        WindowEvent::CloseRequested { .. } => Some(ControllerEvent::CloseRequested),
        WindowEvent::Focused(false) => Some(ControllerEvent::WindowBlurred),
        _ => None,
    }
}

/// Whether an exit request should be refused. Only `exit(code)` carries a
/// code; the request raised when the last window goes away does not.
pub fn keeps_running(code: Option<i32>) -> bool {
    code.is_none()
}

/// Release the global shortcuts; runs on process exit no matter what state
/// the controller is in.
pub fn shutdown(app: &AppHandle) {
    let Some(state) = app.try_state::<ControllerState>() else {
        return;
    };
    let mut controller = state
        .0
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    controller.shutdown();
}
