use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use gpui::*;
use gpui_component::{Theme, ThemeMode, ThemeRegistry};
use miniai_chat::bubble::DEFAULT_WIDTH_FRACTION;
use miniai_chat::normalize_width_fraction;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "miniai";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_KEYBOARD_HEIGHT: f32 = 300.0;
pub const DEFAULT_KEYBOARD_ANIMATION_MS: u64 = 250;
/// Longest keyboard animation accepted from configuration.
const MAX_KEYBOARD_ANIMATION_MS: u64 = 2_000;

/// Desktop stand-in for the platform's on-screen keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardSettings {
    #[serde(default = "default_keyboard_height")]
    pub simulated_height: f32,
    #[serde(default = "default_keyboard_animation_ms")]
    pub animation_ms: u64,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            simulated_height: default_keyboard_height(),
            animation_ms: default_keyboard_animation_ms(),
        }
    }
}

impl KeyboardSettings {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    fn normalized(mut self) -> Self {
        self.simulated_height = if self.simulated_height.is_finite() {
            self.simulated_height.max(0.0)
        } else {
            default_keyboard_height()
        };
        self.animation_ms = self.animation_ms.min(MAX_KEYBOARD_ANIMATION_MS);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(
        default = "default_theme_mode",
        serialize_with = "serialize_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
    #[serde(default)]
    pub theme_name: String,
    #[serde(default = "default_bubble_width_fraction")]
    pub bubble_width_fraction: f32,
    #[serde(default)]
    pub safe_area_bottom: f32,
    #[serde(default)]
    pub keyboard: KeyboardSettings,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            theme_name: String::new(),
            bubble_width_fraction: default_bubble_width_fraction(),
            safe_area_bottom: 0.0,
            keyboard: KeyboardSettings::default(),
        }
    }
}

impl ChatSettings {
    pub fn normalized(mut self) -> Self {
        self.theme_name = self.theme_name.trim().to_string();
        self.bubble_width_fraction = normalize_width_fraction(self.bubble_width_fraction);
        self.safe_area_bottom = if self.safe_area_bottom.is_finite() {
            self.safe_area_bottom.max(0.0)
        } else {
            0.0
        };
        self.keyboard = self.keyboard.normalized();
        self
    }

    pub fn apply_theme(&self, window: Option<&mut Window>, cx: &mut App) {
        if let Some(theme_config) = ThemeRegistry::global(cx)
            .themes()
            .get(&SharedString::from(self.theme_name.clone()))
            .cloned()
        {
            let mode = theme_config.mode;
            let theme = Theme::global_mut(cx);
            if mode.is_dark() {
                theme.dark_theme = theme_config;
            } else {
                theme.light_theme = theme_config;
            }
            Theme::change(mode, window, cx);
            return;
        }

        Theme::change(self.theme_mode, window, cx);
    }
}

/// Live configuration shared by the app shell and the chat view.
pub struct SettingsStore {
    settings: Arc<ArcSwap<ChatSettings>>,
    config_path: PathBuf,
}

impl Global for SettingsStore {}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".miniai"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_or_default(&config_path);
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> Arc<ChatSettings> {
        self.settings.load_full()
    }

    /// Re-reads the file, keeping the previous value when it cannot be parsed.
    pub fn reload(&self) -> Arc<ChatSettings> {
        match Self::read(&self.config_path) {
            Ok(settings) => {
                self.settings.store(Arc::new(settings));
                tracing::info!("reloaded settings from {:?}", self.config_path);
            }
            Err(error) => {
                tracing::warn!("{error}. keeping current settings");
            }
        }
        self.settings()
    }

    /// Reads and normalizes settings; a missing file yields defaults.
    pub fn read(path: &Path) -> Result<ChatSettings, SettingsError> {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return Ok(ChatSettings::default());
        }

        let figment =
            Figment::from(Serialized::defaults(ChatSettings::default())).merge(Json::file(path));
        let settings = figment
            .extract::<ChatSettings>()
            .context(ExtractConfigSnafu {
                stage: "extract-settings-json",
                path: path.to_path_buf(),
            })?;

        Ok(settings.normalized())
    }

    fn load_or_default(path: &Path) -> ChatSettings {
        Self::read(path).unwrap_or_else(|error| {
            tracing::warn!("{error}. using defaults");
            ChatSettings::default()
        })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to parse settings from {path:?} on `{stage}`: {source}"))]
    ExtractConfig {
        stage: &'static str,
        path: PathBuf,
        source: figment::Error,
    },
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn default_bubble_width_fraction() -> f32 {
    DEFAULT_WIDTH_FRACTION
}

fn default_keyboard_height() -> f32 {
    DEFAULT_KEYBOARD_HEIGHT
}

fn default_keyboard_animation_ms() -> u64 {
    DEFAULT_KEYBOARD_ANIMATION_MS
}

fn serialize_theme_mode<S>(value: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_theme_mode(&value))
}

fn parse_theme_mode(value: &str) -> ThemeMode {
    if value.trim().eq_ignore_ascii_case("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-test settings directory, removed when dropped.
    struct Scratch {
        dir: PathBuf,
    }

    impl Scratch {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("miniai-settings-{}-{name}", std::process::id()));
            Self { dir }
        }

        fn path(&self) -> PathBuf {
            self.dir.join(SETTINGS_FILE_NAME)
        }

        fn write(&self, json: &str) -> PathBuf {
            std::fs::create_dir_all(&self.dir).unwrap();
            let path = self.path();
            std::fs::write(&path, json).unwrap();
            path
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[::core::prelude::v1::test]
    fn missing_file_yields_defaults() {
        let scratch = Scratch::new("missing");
        let settings = SettingsStore::read(&scratch.path()).unwrap();

        assert_eq!(settings, ChatSettings::default());
        assert_eq!(settings.bubble_width_fraction, 0.75);
        assert_eq!(settings.keyboard.animation_duration(), Duration::from_millis(250));
    }

    #[::core::prelude::v1::test]
    fn partial_file_merges_over_defaults() {
        let scratch = Scratch::new("partial");
        let path = scratch.write(
            r#"{ "theme_mode": "Dark", "keyboard": { "simulated_height": 280 } }"#,
        );

        let settings = SettingsStore::read(&path).unwrap();

        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert_eq!(settings.keyboard.simulated_height, 280.0);
        assert_eq!(settings.keyboard.animation_ms, DEFAULT_KEYBOARD_ANIMATION_MS);
        assert_eq!(settings.bubble_width_fraction, DEFAULT_WIDTH_FRACTION);
    }

    #[::core::prelude::v1::test]
    fn out_of_range_values_are_normalized() {
        let scratch = Scratch::new("normalize");
        let path = scratch.write(
            r#"{
                "theme_name": "  Solarized  ",
                "bubble_width_fraction": 4.0,
                "safe_area_bottom": -12,
                "keyboard": { "simulated_height": -1, "animation_ms": 60000 }
            }"#,
        );

        let settings = SettingsStore::read(&path).unwrap();

        assert_eq!(settings.theme_name, "Solarized");
        assert_eq!(settings.bubble_width_fraction, 1.0);
        assert_eq!(settings.safe_area_bottom, 0.0);
        assert_eq!(settings.keyboard.simulated_height, 0.0);
        assert_eq!(settings.keyboard.animation_ms, MAX_KEYBOARD_ANIMATION_MS);
    }

    #[::core::prelude::v1::test]
    fn malformed_file_is_an_error_but_store_falls_back() {
        let scratch = Scratch::new("malformed");
        let path = scratch.write("{ not json");

        assert!(matches!(
            SettingsStore::read(&path),
            Err(SettingsError::ExtractConfig { .. })
        ));

        let store = SettingsStore::new(path);
        assert_eq!(*store.settings(), ChatSettings::default());
    }

    #[::core::prelude::v1::test]
    fn reload_keeps_previous_value_on_error() {
        let scratch = Scratch::new("reload");
        let path = scratch.write(r#"{ "bubble_width_fraction": 0.5 }"#);
        let store = SettingsStore::new(path.clone());
        assert_eq!(store.settings().bubble_width_fraction, 0.5);

        std::fs::write(&path, "{ broken").unwrap();
        assert_eq!(store.reload().bubble_width_fraction, 0.5);

        std::fs::write(&path, r#"{ "bubble_width_fraction": 0.6 }"#).unwrap();
        assert_eq!(store.reload().bubble_width_fraction, 0.6);
    }

    #[::core::prelude::v1::test]
    fn scratch_directories_are_removed_after_use() {
        let dir = {
            let scratch = Scratch::new("cleanup");
            scratch.write("{}");
            assert!(scratch.path().exists());
            scratch.dir.clone()
        };

        assert!(!dir.exists());
    }

    #[::core::prelude::v1::test]
    fn theme_mode_parsing_defaults_to_light() {
        assert_eq!(parse_theme_mode("dark"), ThemeMode::Dark);
        assert_eq!(parse_theme_mode(" DARK "), ThemeMode::Dark);
        assert_eq!(parse_theme_mode("light"), ThemeMode::Light);
        assert_eq!(parse_theme_mode("sepia"), ThemeMode::Light);
    }
}
