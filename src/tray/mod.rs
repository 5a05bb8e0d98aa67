//! System tray icon and context menu

pub mod icon;

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tauri::{
    menu::{CheckMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    AppHandle, Rect, Wry,
};

use crate::config::AppConfig;
use crate::controller::hosts::{Bounds, TrayHost};
use crate::controller::ControllerEvent;
use crate::host::dispatch;
use crate::menu::{MenuCommand, MenuItemKind, MenuState};

const TRAY_ICON_ID: &str = "main";

/// Checkbox items, kept so their marks can follow the controller's state
pub struct TrayMenu {
    checkboxes: Vec<(MenuCommand, CheckMenuItem<Wry>)>,
}

impl TrayMenu {
    pub fn apply(&self, state: &MenuState) {
        for (command, item) in &self.checkboxes {
            let Some(checked) = state.is_checked(*command) else {
                continue;
            };
            if let Err(e) = item.set_checked(checked) {
                tracing::warn!("Failed to update {} menu item: {}", command.id(), e);
            }
        }
    }
}

/// Tray bounds from the host, with the last rect seen in a tray event as
/// backup for platforms that cannot report the icon's position on demand
pub struct TauriTray {
    app: AppHandle,
    tray: TrayIcon<Wry>,
    last_rect: Arc<Mutex<Option<Rect>>>,
}

impl TauriTray {
    fn to_logical(&self, rect: Rect) -> Bounds {
        let origin = rect.position.to_physical::<f64>(1.0);
        let scale = self
            .app
            .monitor_from_point(origin.x, origin.y)
            .ok()
            .flatten()
            .map(|monitor| monitor.scale_factor())
            .unwrap_or(1.0);
        let position = rect.position.to_logical::<f64>(scale);
        let size = rect.size.to_logical::<f64>(scale);
        Bounds::new(position.x, position.y, size.width, size.height)
    }
}

impl TrayHost for TauriTray {
    fn bounds(&self) -> Option<Bounds> {
        let rect = match self.tray.rect() {
            Ok(Some(rect)) => Some(rect),
            Ok(None) => self.last_rect.lock().ok().and_then(|rect| *rect),
            Err(e) => {
                tracing::debug!("Tray rect query failed: {}", e);
                self.last_rect.lock().ok().and_then(|rect| *rect)
            }
        };
        rect.map(|rect| self.to_logical(rect))
    }
}

/// Build the tray icon and its menu. Checkbox marks start cleared; apply
/// the controller's `MenuState` once it exists.
pub fn setup_tray(app: &AppHandle, config: &AppConfig) -> Result<(TauriTray, TrayMenu)> {
    let mut plain: Vec<MenuItem<Wry>> = Vec::new();
    let mut checkboxes: Vec<(MenuCommand, CheckMenuItem<Wry>)> = Vec::new();
    let mut order: Vec<(MenuCommand, usize)> = Vec::new();

    for command in MenuCommand::ALL {
        if !command.is_available(config) {
            continue;
        }
        let label = command.label(config);
        match command.kind() {
            MenuItemKind::Plain => {
                let accelerator =
                    (command == MenuCommand::Toggle).then_some(config.toggle_shortcut.as_str());
                let item = MenuItem::with_id(app, command.id(), &label, true, accelerator)
                    .or_else(|e| {
                        tracing::warn!("Menu accelerator rejected for {}: {}", command.id(), e);
                        MenuItem::with_id(app, command.id(), &label, true, None::<&str>)
                    })?;
                order.push((command, plain.len()));
                plain.push(item);
            }
            MenuItemKind::Checkbox => {
                let item =
                    CheckMenuItem::with_id(app, command.id(), &label, true, false, None::<&str>)?;
                order.push((command, checkboxes.len()));
                checkboxes.push((command, item));
            }
        }
    }

    let separator = PredefinedMenuItem::separator(app)?;
    let mut entries: Vec<&dyn IsMenuItem<Wry>> = Vec::new();
    for (command, index) in &order {
        if *command == MenuCommand::Quit {
            entries.push(&separator);
        }
        match command.kind() {
            MenuItemKind::Plain => entries.push(&plain[*index]),
            MenuItemKind::Checkbox => entries.push(&checkboxes[*index].1),
        }
    }
    let menu = Menu::with_items(app, &entries)?;

    let last_rect: Arc<Mutex<Option<Rect>>> = Arc::new(Mutex::new(None));
    let event_rect = last_rect.clone();

    let tray = TrayIconBuilder::with_id(TRAY_ICON_ID)
        .tooltip("Calcbar")
        .icon(icon::load_tray_icon(app, &config.tray_icon))
        .icon_as_template(true)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match MenuCommand::from_id(event.id().as_ref()) {
            Some(command) => dispatch(app, ControllerEvent::Menu(command)),
            None => tracing::warn!("Unknown menu item: {:?}", event.id()),
        })
        .on_tray_icon_event(move |tray, event| {
            let rect = match &event {
                TrayIconEvent::Click { rect, .. }
                | TrayIconEvent::Enter { rect, .. }
                | TrayIconEvent::Move { rect, .. } => Some(*rect),
                _ => None,
            };
            if let (Some(rect), Ok(mut last)) = (rect, event_rect.lock()) {
                *last = Some(rect);
            }

            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                tracing::debug!("Tray icon clicked");
                dispatch(tray.app_handle(), ControllerEvent::TrayClicked);
            }
        })
        .build(app)?;

    tracing::info!("Tray icon created");
    Ok((
        TauriTray {
            app: app.clone(),
            tray,
            last_rect,
        },
        TrayMenu { checkboxes },
    ))
}
