//! Application configuration
//!
//! Read once at startup from `<config_dir>/Calcbar/config.json`. Every field
//! has a default, so a partial file only overrides what it names and a
//! missing file means "all defaults".

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "Calcbar";
const CONFIG_FILENAME: &str = "config.json";

/// Which calculator page the popup hosts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentVariant {
    #[default]
    Scientific,
    Graphing,
}

impl ContentVariant {
    pub fn alternate(self) -> Self {
        match self {
            ContentVariant::Scientific => ContentVariant::Graphing,
            ContentVariant::Graphing => ContentVariant::Scientific,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentVariant::Scientific => "Scientific",
            ContentVariant::Graphing => "Graphing",
        }
    }
}

/// When losing focus hides the popup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurPolicy {
    Always,
    Never,
    /// Hide only when the `hideOnBlur` setting is on
    SettingGated,
    /// Hide unless the developer tools are open
    #[default]
    UnlessInspecting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowChrome {
    #[default]
    Opaque,
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub content: ContentVariant,
    pub blur_policy: BlurPolicy,
    pub chrome: WindowChrome,
    pub toggle_shortcut: String,
    pub hide_shortcut: String,
    pub window_width: f64,
    pub window_height: f64,
    /// Let the webview throttle timers while the popup is hidden
    pub background_throttling: bool,
    pub scientific_url: String,
    pub graphing_url: String,
    /// Tray icon image, relative to the bundle's resource directory
    pub tray_icon: String,
    pub persist_settings: bool,
    pub file_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content: ContentVariant::Scientific,
            blur_policy: BlurPolicy::UnlessInspecting,
            chrome: WindowChrome::Opaque,
            toggle_shortcut: "CmdOrCtrl+Shift+D".to_string(),
            hide_shortcut: "Escape".to_string(),
            window_width: 600.0,
            window_height: 500.0,
            background_throttling: true,
            scientific_url: "https://www.desmos.com/scientific".to_string(),
            graphing_url: "https://www.desmos.com/calculator".to_string(),
            tray_icon: "icons/tray.png".to_string(),
            persist_settings: true,
            file_logging: false,
        }
    }
}

impl AppConfig {
    pub fn calculator_url(&self, variant: ContentVariant) -> &str {
        match variant {
            ContentVariant::Scientific => &self.scientific_url,
            ContentVariant::Graphing => &self.graphing_url,
        }
    }

    /// Load the user config, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = match config_path() {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("Using default config: {:#}", err);
                return Self::default();
            }
        };

        match Self::load_from(&path) {
            Ok(Some(config)) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!("Ignoring config at {}: {:#}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Returns `Ok(None)` when the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(Some(config))
    }
}

fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILENAME))
}
