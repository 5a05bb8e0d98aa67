//! Popup visibility controller
//!
//! Owns the popup window and coordinates it with the tray icon, the global
//! shortcuts and second launches. Every host event arrives through
//! [`VisibilityController::handle`] on the main thread, one at a time.
//!
//! The window is a two-state machine, Hidden and Shown, read straight from
//! the host so the controller never caches a visibility flag that could
//! drift.

pub mod hosts;
pub mod placement;
#[cfg(test)]
pub(crate) mod testing;

use std::time::{Duration, Instant};

use crate::config::{AppConfig, BlurPolicy, ContentVariant, WindowChrome};
use crate::error::Result;
use crate::login::LoginItemHost;
use crate::menu::{MenuCommand, MenuState};
use crate::storage::settings::{HIDE_ON_BLUR, USE_ALTERNATE_CALCULATOR};
use crate::storage::Settings;
use hosts::{
    Bounds, Point, PopupWindow, ShortcutAction, ShortcutHost, TrayHost, WindowHost, WindowSpec,
};

/// A tray click this soon after a blur-triggered hide is the same click
/// that caused the blur, so it must not reopen the popup.
const BLUR_CLICK_GRACE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    SecondInstance,
    Shortcut(ShortcutAction),
    TrayClicked,
    Menu(MenuCommand),
    WindowBlurred,
    CloseRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Collaborators {
    pub windows: Box<dyn WindowHost>,
    pub tray: Box<dyn TrayHost>,
    pub shortcuts: Box<dyn ShortcutHost>,
    pub login_items: Box<dyn LoginItemHost>,
    pub settings: Settings,
}

pub struct VisibilityController {
    config: AppConfig,
    windows: Box<dyn WindowHost>,
    tray: Box<dyn TrayHost>,
    shortcuts: Box<dyn ShortcutHost>,
    login_items: Box<dyn LoginItemHost>,
    settings: Settings,
    window: Option<Box<dyn PopupWindow>>,
    last_anchor: Option<Point>,
    blur_hidden_at: Option<Instant>,
    shut_down: bool,
}

impl VisibilityController {
    pub fn new(config: AppConfig, hosts: Collaborators) -> Self {
        Self {
            config,
            windows: hosts.windows,
            tray: hosts.tray,
            shortcuts: hosts.shortcuts,
            login_items: hosts.login_items,
            settings: hosts.settings,
            window: None,
            last_anchor: None,
            blur_hidden_at: None,
            shut_down: false,
        }
    }

    /// Create the hidden popup and register the global shortcuts.
    ///
    /// A shortcut that fails to register is logged and skipped; the app
    /// keeps running without it.
    pub fn start(&mut self) -> Result<()> {
        self.ensure_window()?;

        let bindings = [
            (self.config.toggle_shortcut.clone(), ShortcutAction::Toggle),
            (self.config.hide_shortcut.clone(), ShortcutAction::Hide),
        ];
        for (accelerator, action) in bindings {
            match self.shortcuts.register(&accelerator, action) {
                Ok(()) => tracing::debug!("Registered {} for {:?}", accelerator, action),
                Err(err) => tracing::warn!("{}", err),
            }
        }

        tracing::info!(
            "Controller started with {} active shortcut(s)",
            self.shortcuts.active()
        );
        Ok(())
    }

    /// Unregister every global shortcut. Events arriving afterwards are
    /// ignored.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Err(err) = self.shortcuts.unregister_all() {
            tracing::error!("Failed to unregister shortcuts: {}", err);
        }
        tracing::info!("Global shortcuts unregistered");
    }

    #[cfg(test)]
    pub fn active_shortcuts(&self) -> usize {
        self.shortcuts.active()
    }

    pub fn handle(&mut self, event: ControllerEvent) -> Flow {
        if self.shut_down {
            tracing::debug!("Ignoring {:?} after shutdown", event);
            return Flow::Continue;
        }

        let result = match event {
            ControllerEvent::SecondInstance => self.on_second_instance().map(|_| Flow::Continue),
            ControllerEvent::Shortcut(ShortcutAction::Toggle) => {
                self.toggle().map(|_| Flow::Continue)
            }
            ControllerEvent::Shortcut(ShortcutAction::Hide) => self.hide().map(|_| Flow::Continue),
            ControllerEvent::TrayClicked => self.on_tray_click().map(|_| Flow::Continue),
            ControllerEvent::Menu(command) => self.run_menu(command),
            ControllerEvent::WindowBlurred => self.on_blur().map(|_| Flow::Continue),
            // Closing must never end the process; the popup just goes away
            ControllerEvent::CloseRequested => self.hide().map(|_| Flow::Continue),
        };

        match result {
            Ok(flow) => flow,
            Err(err) => {
                tracing::warn!("Failed to handle {:?}: {}", event, err);
                Flow::Continue
            }
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self.window.as_deref() {
            Some(window) if !window.is_destroyed() && window.is_visible() => Visibility::Shown,
            _ => Visibility::Hidden,
        }
    }

    /// The variant the next window will load
    pub fn content_variant(&mut self) -> ContentVariant {
        if self.settings.read(USE_ALTERNATE_CALCULATOR) {
            self.config.content.alternate()
        } else {
            self.config.content
        }
    }

    /// Return the live popup, creating it when absent or destroyed
    pub fn ensure_window(&mut self) -> Result<&dyn PopupWindow> {
        self.discard_destroyed();
        let window = match self.window.take() {
            Some(window) => window,
            None => {
                let spec = self.window_spec();
                let window = self.windows.create(&spec)?;
                tracing::info!("Popup window created ({} calculator)", spec.variant.label());
                window
            }
        };
        Ok(&**self.window.insert(window))
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.ensure_window()?.is_visible() {
            self.hide()
        } else {
            self.show()
        }
    }

    /// Position the popup under the tray icon, then show and focus it
    ///
    /// Positioning problems fall back to the last anchor or the host's own
    /// placement; they never stop the window from showing.
    pub fn show(&mut self) -> Result<()> {
        let tray_bounds = self.tray.bounds();
        let last_anchor = self.last_anchor;
        let configured = Bounds::new(
            0.0,
            0.0,
            self.config.window_width,
            self.config.window_height,
        );
        let window = self.ensure_window()?;

        let anchor = match tray_bounds {
            Some(tray) => {
                let size = window.bounds().unwrap_or_else(|err| {
                    tracing::debug!("Window size unavailable, using configured size: {}", err);
                    configured
                });
                Some(placement::anchor_below(tray, size))
            }
            None => {
                tracing::debug!("Tray bounds unavailable, using fallback position");
                None
            }
        };
        let placed = match anchor.or(last_anchor) {
            Some(position) => window.set_position(position),
            None => window.place_default(),
        };
        if let Err(err) = &placed {
            tracing::warn!("Failed to position popup: {}", err);
        }
        window.show()?;
        window.focus()?;

        if anchor.is_some() && placed.is_ok() {
            self.last_anchor = anchor;
        }
        self.blur_hidden_at = None;
        tracing::debug!("Popup shown");
        Ok(())
    }

    /// Hide without destroying; no-op when already hidden
    pub fn hide(&mut self) -> Result<()> {
        self.discard_destroyed();
        let Some(window) = self.window.as_deref() else {
            return Ok(());
        };
        if !window.is_visible() {
            return Ok(());
        }
        window.hide()?;
        tracing::debug!("Popup hidden");
        Ok(())
    }

    /// Rebuild the popup so a new content configuration takes effect
    pub fn reload(&mut self) -> Result<()> {
        self.hide()?;
        if let Some(window) = self.window.take() {
            if let Err(err) = window.destroy() {
                if !window.is_destroyed() {
                    // Still alive in the host; keep owning it so no second
                    // popup gets built next to it
                    self.window = Some(window);
                    return Err(err);
                }
            }
        }
        self.ensure_window()?;
        tracing::info!("Popup window reloaded");
        Ok(())
    }

    pub fn on_second_instance(&mut self) -> Result<()> {
        tracing::info!("Second launch, bringing popup forward");
        let window = self.ensure_window()?;
        if window.is_minimized() {
            window.restore()?;
        }
        if window.is_visible() {
            window.focus()
        } else {
            self.show()
        }
    }

    pub fn on_blur(&mut self) -> Result<()> {
        if !self.should_hide_on_blur() {
            return Ok(());
        }
        let was_shown = self.visibility() == Visibility::Shown;
        self.hide()?;
        if was_shown {
            self.blur_hidden_at = Some(Instant::now());
        }
        Ok(())
    }

    pub fn menu_state(&mut self) -> MenuState {
        let start_at_login = self.login_items.is_enabled().unwrap_or_else(|err| {
            tracing::warn!("{}", err);
            false
        });
        MenuState {
            alternate_calculator: self.settings.read(USE_ALTERNATE_CALCULATOR),
            hide_on_blur: self.settings.read(HIDE_ON_BLUR),
            start_at_login,
        }
    }

    fn on_tray_click(&mut self) -> Result<()> {
        let just_hidden = self
            .blur_hidden_at
            .take()
            .is_some_and(|at| at.elapsed() < BLUR_CLICK_GRACE);
        if just_hidden {
            tracing::debug!("Tray click closed the popup through blur");
            return Ok(());
        }
        self.toggle()
    }

    fn run_menu(&mut self, command: MenuCommand) -> Result<Flow> {
        tracing::debug!("Menu command {:?}", command);
        match command {
            MenuCommand::Toggle => self.toggle()?,
            MenuCommand::AlternateCalculator => {
                let enabled = self.settings.flip(USE_ALTERNATE_CALCULATOR)?;
                if let Err(err) = self.reload() {
                    // The old content is still loaded, so the flag goes back
                    // to match it
                    self.settings.write(USE_ALTERNATE_CALCULATOR, !enabled)?;
                    return Err(err);
                }
                tracing::info!("Alternate calculator {}", if enabled { "on" } else { "off" });
            }
            MenuCommand::HideOnBlur => {
                self.settings.flip(HIDE_ON_BLUR)?;
            }
            MenuCommand::StartAtLogin => {
                let enabled = !self.login_items.is_enabled()?;
                self.login_items.set_enabled(enabled)?;
            }
            MenuCommand::Quit => {
                tracing::info!("Quit requested");
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn should_hide_on_blur(&mut self) -> bool {
        match self.config.blur_policy {
            BlurPolicy::Always => true,
            BlurPolicy::Never => false,
            BlurPolicy::SettingGated => self.settings.read(HIDE_ON_BLUR),
            BlurPolicy::UnlessInspecting => !self
                .window
                .as_deref()
                .is_some_and(|window| window.is_devtools_open()),
        }
    }

    fn discard_destroyed(&mut self) {
        if self.window.as_deref().is_some_and(|window| window.is_destroyed()) {
            tracing::debug!("Popup window was destroyed by the host, dropping handle");
            self.window = None;
        }
    }

    fn window_spec(&mut self) -> WindowSpec {
        let variant = self.content_variant();
        WindowSpec {
            variant,
            url: self.config.calculator_url(variant).to_string(),
            width: self.config.window_width,
            height: self.config.window_height,
            transparent: self.config.chrome == WindowChrome::Transparent,
            background_throttling: self.config.background_throttling,
        }
    }
}
