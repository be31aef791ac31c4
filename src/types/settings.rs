use crate::errors::HeroTextErrors;
use crate::typing::caret::{CaretOscillator, DEFAULT_CARET_PERIOD_MS};
use crate::typing::task::TypingParams;
use config::{Config, ConfigError, Environment, File};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

const ENV_PREFIX: &str = "HEROTEXT";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeroStat {
    pub value: String,
    pub label: String,
}

impl Default for HeroStat {
    fn default() -> Self {
        Self {
            value: "5+".to_string(),
            label: "Projects Completed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeroSettings {
    pub(crate) badge: String,
    pub(crate) greeting: String,
    pub(crate) name: String,
    pub(crate) interval_ms: u64,
    pub(crate) start_delay_ms: u64,
    pub(crate) caret_period_ms: u64,
    pub(crate) caret_fade: bool,
    pub(crate) taglines: Vec<String>,
    pub(crate) stats: Vec<HeroStat>,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            badge: "Available for work".to_string(),
            greeting: "Hi, I'm".to_string(),
            name: "Vihanga Nimsara".to_string(),
            interval_ms: 100,
            start_delay_ms: 100,
            caret_period_ms: DEFAULT_CARET_PERIOD_MS,
            caret_fade: true,
            taglines: vec!["Computer Science Undergraduate & Full Stack Developer.".to_string()],
            stats: vec![HeroStat::default()],
        }
    }
}

impl HeroSettings {
    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn taglines(&self) -> &[String] {
        &self.taglines
    }

    pub fn stats(&self) -> &[HeroStat] {
        &self.stats
    }

    /// Parameters for the tagline at `index`, wrapping around the list.
    pub fn typing_params(&self, index: usize) -> Result<TypingParams, HeroTextErrors> {
        if self.taglines.is_empty() {
            return Err(HeroTextErrors::InvalidParameter(
                "at least one tagline is required".to_string(),
            ));
        }
        let text = &self.taglines[index % self.taglines.len()];
        TypingParams::new(text.as_str(), self.interval_ms, self.start_delay_ms)
    }

    pub fn caret(&self) -> Result<CaretOscillator, HeroTextErrors> {
        CaretOscillator::new(self.caret_period_ms)
    }

    /// Fade the caret in and out instead of switching it on and off.
    pub fn caret_fade(&self) -> bool {
        self.caret_fade
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SettingsApp {
    level: String,
    pub(crate) font_size: f32,
    pub(crate) text_color: (u8, u8, u8),
    pub(crate) accent_color: (u8, u8, u8),
    pub(crate) window_width: f32,
    pub(crate) window_height: f32,
    pub(crate) hero: HeroSettings,
}

impl Default for SettingsApp {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            font_size: 28.0,
            text_color: (255, 255, 255),
            accent_color: (13, 138, 188),
            window_width: 960.0,
            window_height: 540.0,
            hero: HeroSettings::default(),
        }
    }
}

impl SettingsApp {
    /// Reads `path` (optional) and `HEROTEXT_*` environment overrides.
    ///
    /// Nested keys use a double underscore: `HEROTEXT_HERO__INTERVAL_MS=50`.
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        s.try_deserialize()
    }

    /// Like [`SettingsApp::new`], writing a default file first if none exists.
    pub fn load_or_create(path: &Path) -> Result<Self, HeroTextErrors> {
        if !path.exists() {
            log::info!("writing default settings to {}", path.display());
            fs::write(path, toml::to_string_pretty(&SettingsApp::default())?)?;
        }
        Ok(Self::new(path)?)
    }

    pub fn validate(&self) -> Result<(), HeroTextErrors> {
        self.level()?;
        if self.font_size <= 0.0 {
            return Err(HeroTextErrors::InvalidParameter(
                "field `font_size` must be positive".to_string(),
            ));
        }
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return Err(HeroTextErrors::InvalidParameter(
                "fields `window_width` and `window_height` must be positive".to_string(),
            ));
        }
        for index in 0..self.hero.taglines.len().max(1) {
            self.hero.typing_params(index)?;
        }
        self.hero.caret()?;
        Ok(())
    }

    pub fn level(&self) -> Result<LevelFilter, HeroTextErrors> {
        LevelFilter::from_str(&self.level).map_err(|_| {
            HeroTextErrors::InvalidParameter(format!(
                "field `level` isn't valid: `{}`. did u mean `info`, `debug` and `warn`?",
                self.level
            ))
        })
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn text_color(&self) -> eframe::egui::Color32 {
        let (r, g, b) = self.text_color;
        eframe::egui::Color32::from_rgb(r, g, b)
    }

    pub fn accent_color(&self) -> eframe::egui::Color32 {
        let (r, g, b) = self.accent_color;
        eframe::egui::Color32::from_rgb(r, g, b)
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.window_width, self.window_height)
    }

    pub fn hero(&self) -> &HeroSettings {
        &self.hero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    // Tests that read `HEROTEXT_*` variables must not overlap with one that sets them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_are_valid() {
        let settings = SettingsApp::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn default_tagline_matches_hero_banner() {
        let hero = HeroSettings::default();
        let params = hero.typing_params(0).unwrap();
        assert_eq!(
            params.full_text(),
            "Computer Science Undergraduate & Full Stack Developer."
        );
        assert_eq!(params.interval(), Duration::from_millis(100));
        assert_eq!(params.start_delay(), Duration::from_millis(100));
    }

    #[test]
    fn taglines_wrap_around() {
        let hero = HeroSettings {
            taglines: vec!["one".to_string(), "two".to_string()],
            ..HeroSettings::default()
        };
        assert_eq!(hero.typing_params(1).unwrap().full_text(), "two");
        assert_eq!(hero.typing_params(2).unwrap().full_text(), "one");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut settings = SettingsApp::default();
        settings.hero.interval_ms = 0;
        assert!(matches!(
            settings.validate(),
            Err(HeroTextErrors::InvalidParameter(_))
        ));
    }

    #[test]
    fn empty_taglines_are_rejected() {
        let mut settings = SettingsApp::default();
        settings.hero.taglines.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn bad_level_is_rejected() {
        let settings = SettingsApp {
            level: "loud".to_string(),
            ..SettingsApp::default()
        };
        assert!(settings.level().is_err());
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
level = "debug"
font_size = 32.0

[hero]
name = "Ada"
interval_ms = 40
taglines = ["Systems programmer."]
"#,
        )
        .unwrap();

        let settings = SettingsApp::new(&path).unwrap();
        assert_eq!(settings.level().unwrap(), LevelFilter::Debug);
        assert_eq!(settings.font_size(), 32.0);
        assert_eq!(settings.hero().name(), "Ada");
        assert_eq!(settings.hero().greeting(), "Hi, I'm");
        let params = settings.hero().typing_params(0).unwrap();
        assert_eq!(params.full_text(), "Systems programmer.");
        assert_eq!(params.interval(), Duration::from_millis(40));
        assert_eq!(params.start_delay(), Duration::from_millis(100));
    }

    #[test]
    fn load_or_create_writes_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = SettingsApp::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(settings, SettingsApp::default());
    }

    #[test]
    fn environment_overrides_the_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
font_size = 32.0

[hero]
name = "Ada"
interval_ms = 40
"#,
        )
        .unwrap();

        unsafe {
            std::env::set_var("HEROTEXT_FONT_SIZE", "40");
            std::env::set_var("HEROTEXT_HERO__INTERVAL_MS", "50");
        }
        let settings = SettingsApp::new(&path);
        unsafe {
            std::env::remove_var("HEROTEXT_FONT_SIZE");
            std::env::remove_var("HEROTEXT_HERO__INTERVAL_MS");
        }

        let settings = settings.unwrap();
        assert_eq!(settings.font_size(), 40.0);
        assert_eq!(settings.hero().name(), "Ada");
        let params = settings.hero().typing_params(0).unwrap();
        assert_eq!(params.interval(), Duration::from_millis(50));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn caret_fades_by_default() {
        assert!(HeroSettings::default().caret_fade());
    }
}
