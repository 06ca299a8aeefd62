use crate::carousel::{Deck, DeckError, Settings, Slide};
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use palette::Srgb;
use palette::rgb::FromHexError;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// `#RRGGBB` as written in the config file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deref, From, Into, DeserializeFromStr, SerializeDisplay,
)]
pub struct SlideColor(Srgb<u8>);

#[derive(Error, Debug)]
#[error("invalid slide colour {input:?}: {source}")]
pub struct SlideColorError {
    input: String,
    #[source]
    source: FromHexError,
}

impl FromStr for SlideColor {
    type Err = SlideColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|source| SlideColorError {
                input: s.to_string(),
                source,
            })
    }
}

impl fmt::Display for SlideColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0.red, self.0.green, self.0.blue)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlideConfig {
    pub name: String,
    pub color: SlideColor,
    pub image: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub slides: Vec<SlideConfig>,
    #[serde(default = "default_autoplay_delay_ms")]
    pub autoplay_delay_ms: u64,
    /// Overrides the desktop's animation preference when set.
    #[serde(default)]
    pub reduced_motion: Option<bool>,
}

fn default_autoplay_delay_ms() -> u64 {
    Settings::default().autoplay_delay.as_millis() as u64
}

impl Config {
    /// Builds the deck, resolving relative image paths against `base_dir`.
    pub fn deck(&self, base_dir: &Path) -> Result<Deck, ConfigError> {
        let slides = self
            .slides
            .iter()
            .map(|slide| {
                let image = if slide.image.is_relative() {
                    base_dir.join(&slide.image)
                } else {
                    slide.image.clone()
                };
                Slide::new(slide.name.as_str(), *slide.color, image)
            })
            .collect();
        Ok(Deck::new(slides)?)
    }

    pub fn settings(&self, prefers_reduced_motion: bool) -> Settings {
        Settings {
            autoplay_delay: Duration::from_millis(self.autoplay_delay_ms),
            reduced_motion: self.reduced_motion.unwrap_or(prefers_reduced_motion),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "slider", "slider").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Loads the layered config at `path` and builds its deck. Relative image
/// paths resolve against the directory holding `path`.
pub fn load_config(path: &Path) -> Result<(Config, Deck), ConfigError> {
    let config = load_from(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let deck = config.deck(base_dir)?;
    Ok((config, deck))
}

/// Embedded defaults, then `path` if it exists, then `SLIDER_*` variables.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let s = defaults()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("SLIDER").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    ))
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
