//! Settings storage

pub mod plugin_store;
pub mod settings;

pub use plugin_store::PluginStore;
pub use settings::{BoolSetting, MemoryStore, Settings, SettingsStore};
