//! Calcbar - tray calculator
//!
//! A tray icon and a global shortcut toggle a small frameless popup hosting
//! a calculator page.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod logging;
pub mod login;
pub mod menu;
pub mod storage;
pub mod tray;

use std::sync::Mutex;

use anyhow::Result;
use tauri::{Manager, RunEvent, WindowEvent};
use tauri_plugin_autostart::MacosLauncher;

use config::AppConfig;
use controller::{Collaborators, ControllerEvent, VisibilityController};
use host::{ControllerState, TauriShortcuts, TauriWindowHost};
use login::AutostartLoginItems;
use storage::{PluginStore, Settings};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    logging::init_logging();
    let config = AppConfig::load();
    logging::set_file_logging(config.file_logging);

    // The single-instance plugin has to come first: a second process must
    // exit before any other plugin touches shared resources.
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            host::dispatch(app, ControllerEvent::SecondInstance);
        }))
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_positioner::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_autostart::init(MacosLauncher::LaunchAgent, None))
        .setup(move |app| {
            setup(app, config)?;
            tracing::info!("Calcbar initialized successfully");
            Ok(())
        })
        .on_window_event(|window, event| {
            let Some(controller_event) = host::popup_event(window.label(), event) else {
                return;
            };
            if let WindowEvent::CloseRequested { api, .. } = event {
                api.prevent_close();
            }
            host::dispatch(window.app_handle(), controller_event);
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app, event| match event {
        // No window left (e.g. mid-reload) is not a reason to quit
        RunEvent::ExitRequested { code, api, .. } if host::keeps_running(code) => {
            tracing::debug!("Ignoring exit request without code");
            api.prevent_exit();
        }
        RunEvent::Exit => host::shutdown(app),
        _ => {}
    });
}

fn setup(app: &mut tauri::App, config: AppConfig) -> Result<()> {
    #[cfg(target_os = "macos")]
    app.set_activation_policy(tauri::ActivationPolicy::Accessory);

    let handle = app.handle().clone();

    let settings = if config.persist_settings {
        Settings::new(Box::new(PluginStore::open(&handle)?))
    } else {
        Settings::in_memory()
    };
    let (tray, tray_menu) = tray::setup_tray(&handle, &config)?;

    let mut controller = VisibilityController::new(
        config,
        Collaborators {
            windows: Box::new(TauriWindowHost::new(handle.clone())),
            tray: Box::new(tray),
            shortcuts: Box::new(TauriShortcuts::new(handle.clone())),
            login_items: Box::new(AutostartLoginItems::new(handle.clone())),
            settings,
        },
    );
    controller.start()?;
    tray_menu.apply(&controller.menu_state());

    app.manage(tray_menu);
    app.manage(ControllerState(Mutex::new(controller)));
    Ok(())
}
