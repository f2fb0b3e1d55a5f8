use anyhow::{Context, Result};
use directories::ProjectDirs;
use pomo_core::{PhaseKind, TimerSettings};
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub timer: TimerSettings,
    pub alerts: Alerts,
    pub theme: Theme,
    pub icons: Icons,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Alerts {
    /// Desktop notification when a phase ends.
    pub desktop: bool,
    /// Terminal bell when a phase ends.
    pub bell: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub surface: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub muted: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub accent: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub error: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub work: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub short_break: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub long_break: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub play: String,
    pub pause: String,
    pub session_done: String,
    pub session_pending: String,
    pub select: String,
    pub input_cursor: String,
    pub separator: String,
    pub header_left: String,
    pub header_right: String,
}

impl Default for Alerts {
    fn default() -> Self {
        Self {
            desktop: true,
            bell: true,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(9, 14, 19),
            foreground: Color::Rgb(197, 201, 199),
            surface: Color::Rgb(13, 12, 12),
            muted: Color::Rgb(164, 167, 164),
            accent: Color::Rgb(230, 195, 132),
            error: Color::Rgb(228, 104, 118),
            work: Color::Rgb(228, 104, 118),
            short_break: Color::Rgb(138, 154, 123),
            long_break: Color::Rgb(127, 180, 202),
        }
    }
}

impl Theme {
    pub fn phase_color(&self, phase: PhaseKind) -> Color {
        match phase {
            PhaseKind::Work => self.work,
            PhaseKind::ShortBreak => self.short_break,
            PhaseKind::LongBreak => self.long_break,
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            play: "▶".to_string(),
            pause: "⏸".to_string(),
            session_done: "●".to_string(),
            session_pending: "○".to_string(),
            select: "▸".to_string(),
            input_cursor: "▊".to_string(),
            separator: "│".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pomo", "pomo")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("pomo.toml"))
}

/// Loads the config file. An explicit `path` must exist; the default
/// location is optional and falls back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(Config::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config file at {:?}", path))
}
