pub mod state;

pub use state::{ChatSettings, KeyboardSettings, SettingsError, SettingsStore};
