use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::playback::settings::{
    DEFAULT_COUNTDOWN, DEFAULT_FONT_SIZE, DEFAULT_SPEED, MAX_FONT_SIZE, MAX_SPEED, MIN_FONT_SIZE,
};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "prompter";

pub const MIN_COUNTDOWN: u32 = 1;
pub const MAX_COUNTDOWN: u32 = 10;

pub const VALID_KEYS: &str = "defaults.theme, defaults.font_size, defaults.speed, defaults.mirrored, defaults.countdown, defaults.scripts_dir";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<bool>,

    /// Countdown length in seconds before scrolling starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts_dir: Option<PathBuf>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `prompter config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Prompter configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    pub fn font_size(&self) -> u32 {
        self.defaults
            .as_ref()
            .and_then(|d| d.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn speed(&self) -> f32 {
        self.defaults
            .as_ref()
            .and_then(|d| d.speed)
            .unwrap_or(DEFAULT_SPEED)
    }

    pub fn mirrored(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.mirrored)
            .unwrap_or(false)
    }

    pub fn countdown(&self) -> u32 {
        self.defaults
            .as_ref()
            .and_then(|d| d.countdown)
            .unwrap_or(DEFAULT_COUNTDOWN)
    }

    pub fn scripts_dir(&self) -> Option<&Path> {
        self.defaults
            .as_ref()
            .and_then(|d| d.scripts_dir.as_deref())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                defaults.theme = Some(value.to_string());
            }
            "defaults.font_size" => {
                let size: u32 = value
                    .parse()
                    .ok()
                    .filter(|s| (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(s))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid font_size: {value}. Must be a whole number between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}."
                        )
                    })?;
                defaults.font_size = Some(size);
            }
            "defaults.speed" => {
                let speed: f32 = value
                    .parse()
                    .ok()
                    .filter(|s: &f32| (0.0..=MAX_SPEED).contains(s))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid speed: {value}. Must be between 0 and {MAX_SPEED} pixels per second."
                        )
                    })?;
                defaults.speed = Some(speed);
            }
            "defaults.mirrored" => {
                let mirrored = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid mirrored: {value}. Must be 'true' or 'false'."),
                };
                defaults.mirrored = Some(mirrored);
            }
            "defaults.countdown" => {
                let seconds: u32 = value
                    .parse()
                    .ok()
                    .filter(|s| (MIN_COUNTDOWN..=MAX_COUNTDOWN).contains(s))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid countdown: {value}. Must be between {MIN_COUNTDOWN} and {MAX_COUNTDOWN} seconds."
                        )
                    })?;
                defaults.countdown = Some(seconds);
            }
            "defaults.scripts_dir" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid scripts_dir: path must not be empty.");
                }
                defaults.scripts_dir = Some(PathBuf::from(value));
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.theme(), "light");
        assert_eq!(config.font_size(), DEFAULT_FONT_SIZE);
        assert_eq!(config.speed(), DEFAULT_SPEED);
        assert!(!config.mirrored());
        assert_eq!(config.countdown(), 3);
        assert!(config.scripts_dir().is_none());
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.font_size", "64").unwrap();
        config.set("defaults.speed", "250.5").unwrap();
        config.set("defaults.mirrored", "on").unwrap();
        config.set("defaults.countdown", "5").unwrap();
        config.set("defaults.scripts_dir", "/tmp/scripts").unwrap();
        assert_eq!(config.theme(), "dark");
        assert_eq!(config.font_size(), 64);
        assert_eq!(config.speed(), 250.5);
        assert!(config.mirrored());
        assert_eq!(config.countdown(), 5);
        assert_eq!(config.scripts_dir(), Some(Path::new("/tmp/scripts")));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut config = Config::default();
        assert!(config.set("defaults.font_size", "8").is_err());
        assert!(config.set("defaults.font_size", "big").is_err());
        assert!(config.set("defaults.speed", "2001").is_err());
        assert!(config.set("defaults.speed", "-1").is_err());
        assert!(config.set("defaults.countdown", "0").is_err());
        assert!(config.set("defaults.mirrored", "maybe").is_err());
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.nope", "1").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.speed", "300").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.speed(), 300.0);
        assert_eq!(loaded.font_size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
