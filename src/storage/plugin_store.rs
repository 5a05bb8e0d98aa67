//! Settings persisted through `tauri-plugin-store`

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tauri::{AppHandle, Wry};
use tauri_plugin_store::{Store, StoreExt};

use super::settings::SettingsStore;
use crate::error::ControllerError;

const SETTINGS_FILENAME: &str = "settings.json";

pub struct PluginStore {
    store: Arc<Store<Wry>>,
}

impl PluginStore {
    pub fn open(app: &AppHandle) -> Result<Self> {
        let store = app
            .store(SETTINGS_FILENAME)
            .context("Failed to open settings store")?;
        Ok(Self { store })
    }
}

impl SettingsStore for PluginStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> crate::error::Result<()> {
        self.store.set(key, value);
        self.store
            .save()
            .map_err(|err| ControllerError::Settings(format!("Failed to save {key}: {err}")))
    }
}
