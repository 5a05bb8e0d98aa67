//! Typed boolean settings over a key/value store
//!
//! A setting that has never been read is materialized with its declared
//! default on first read, so the backing file always lists every key the
//! app knows about.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{ControllerError, Result};

pub trait SettingsStore: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolSetting {
    pub key: &'static str,
    pub default: bool,
}

/// Swap the base calculator for the other variant
pub const USE_ALTERNATE_CALCULATOR: BoolSetting = BoolSetting {
    key: "useAlternateCalculator",
    default: false,
};

pub const HIDE_ON_BLUR: BoolSetting = BoolSetting {
    key: "hideOnBlur",
    default: false,
};

pub struct Settings {
    store: Box<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    pub fn read(&mut self, setting: BoolSetting) -> bool {
        match self.store.get(setting.key) {
            Some(Value::Bool(value)) => value,
            Some(other) => {
                tracing::warn!(
                    "Setting {} holds {}, resetting to {}",
                    setting.key,
                    other,
                    setting.default
                );
                self.materialize(setting);
                setting.default
            }
            None => {
                self.materialize(setting);
                setting.default
            }
        }
    }

    pub fn write(&mut self, setting: BoolSetting, value: bool) -> Result<()> {
        self.store.set(setting.key, Value::Bool(value))?;
        tracing::debug!("Setting {} = {}", setting.key, value);
        Ok(())
    }

    /// Invert a setting and return the new value
    pub fn flip(&mut self, setting: BoolSetting) -> Result<bool> {
        let value = !self.read(setting);
        self.write(setting, value)?;
        Ok(value)
    }

    fn materialize(&mut self, setting: BoolSetting) {
        if let Err(err) = self.store.set(setting.key, Value::Bool(setting.default)) {
            tracing::warn!("Failed to persist default for {}: {}", setting.key, err);
        }
    }
}

/// Process-lifetime store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| ControllerError::Settings("Settings lock poisoned".to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BoolSetting, MemoryStore, Settings, SettingsStore, HIDE_ON_BLUR,
        USE_ALTERNATE_CALCULATOR,
    };
    use serde_json::Value;

    fn settings_with_store() -> (Settings, MemoryStore) {
        let store = MemoryStore::default();
        (Settings::new(Box::new(store.clone())), store)
    }

    #[test]
    fn unset_key_reads_default_and_persists_it() {
        let (mut settings, store) = settings_with_store();
        assert_eq!(store.get(HIDE_ON_BLUR.key), None);

        assert!(!settings.read(HIDE_ON_BLUR));
        assert_eq!(store.get(HIDE_ON_BLUR.key), Some(Value::Bool(false)));
    }

    #[test]
    fn written_value_reads_back() {
        let (mut settings, _store) = settings_with_store();
        settings.write(USE_ALTERNATE_CALCULATOR, true).unwrap();
        assert!(settings.read(USE_ALTERNATE_CALCULATOR));
        settings.write(USE_ALTERNATE_CALCULATOR, false).unwrap();
        assert!(!settings.read(USE_ALTERNATE_CALCULATOR));
    }

    #[test]
    fn true_default_is_materialized() {
        let (mut settings, store) = settings_with_store();
        let setting = BoolSetting {
            key: "showTooltips",
            default: true,
        };
        assert!(settings.read(setting));
        assert_eq!(store.get("showTooltips"), Some(Value::Bool(true)));
    }

    #[test]
    fn flip_inverts_current_value() {
        let (mut settings, _store) = settings_with_store();
        assert!(settings.flip(HIDE_ON_BLUR).unwrap());
        assert!(settings.read(HIDE_ON_BLUR));
        assert!(!settings.flip(HIDE_ON_BLUR).unwrap());
    }

    #[test]
    fn non_boolean_value_is_reset() {
        let (mut settings, mut store) = settings_with_store();
        store
            .set(HIDE_ON_BLUR.key, Value::String("yes".to_string()))
            .unwrap();
        assert!(!settings.read(HIDE_ON_BLUR));
        assert_eq!(store.get(HIDE_ON_BLUR.key), Some(Value::Bool(false)));
    }
}
