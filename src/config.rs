use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::types::Screen;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MIN_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Parser, Debug, Default)]
#[command(name = "mcgym", version, about = "MC GYM administration console")]
pub struct Cli {
    /// Base URL of the gym REST API
    #[arg(long)]
    pub api_url: Option<String>,
    /// Bearer token for the API
    #[arg(long, env = "MCGYM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Paginate, sort and search every list locally
    #[arg(long)]
    pub client_side: bool,
    /// Write the log here instead of the cache directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Log debug messages
    #[arg(long, short)]
    pub verbose: bool,
    /// Delete the saved configuration and exit
    #[arg(long)]
    pub reset: bool,
}

/// Accent colour used for highlights and the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Cyan,
    Green,
    Magenta,
    Yellow,
    Blue,
    Red,
}

impl Accent {
    pub const ALL: [Accent; 6] = [
        Accent::Cyan,
        Accent::Green,
        Accent::Magenta,
        Accent::Yellow,
        Accent::Blue,
        Accent::Red,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Accent::Cyan => "cyan",
            Accent::Green => "green",
            Accent::Magenta => "magenta",
            Accent::Yellow => "yellow",
            Accent::Blue => "blue",
            Accent::Red => "red",
        }
    }

    pub fn from_name(name: &str) -> Option<Accent> {
        Accent::ALL.into_iter().find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn next(self) -> Accent {
        let index = Accent::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Accent::ALL[(index + 1) % Accent::ALL.len()]
    }

    pub fn prev(self) -> Accent {
        let index = Accent::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Accent::ALL[(index + Accent::ALL.len() - 1) % Accent::ALL.len()]
    }
}

/// Personalization saved between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedConfig {
    pub api_url: Option<String>,
    pub page_size: usize,
    pub accent: Accent,
    pub force_client_side: bool,
    pub start_screen: Screen,
}

impl Default for SavedConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            accent: Accent::default(),
            force_client_side: false,
            start_screen: Screen::Students,
        }
    }
}

/// Effective settings after merging CLI flags, saved config and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub token: Option<String>,
    pub page_size: usize,
    pub accent: Accent,
    pub force_client_side: bool,
    pub start_screen: Screen,
}

impl Settings {
    pub fn resolve(cli: &Cli, saved: Option<&SavedConfig>) -> Self {
        let defaults = SavedConfig::default();
        let saved = saved.unwrap_or(&defaults);

        Self {
            api_url: cli
                .api_url
                .clone()
                .or_else(|| saved.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: cli.token.clone(),
            page_size: clamp_page_size(cli.page_size.unwrap_or(saved.page_size)),
            accent: saved.accent,
            force_client_side: cli.client_side || saved.force_client_side,
            start_screen: saved.start_screen,
        }
    }
}

pub fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mcgym").join("config.json"))
}

pub fn load_config() -> Option<SavedConfig> {
    config_path().and_then(|path| load_config_from(&path))
}

pub fn load_config_from(path: &Path) -> Option<SavedConfig> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("ignoring unreadable config {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_config(config: &SavedConfig) -> Result<(), io::Error> {
    let path = config_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
    save_config_to(config, &path)
}

pub fn save_config_to(config: &SavedConfig, path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

/// Remove the saved configuration. `Ok(false)` if there was none.
pub fn reset_config() -> Result<bool, io::Error> {
    match config_path() {
        Some(path) => reset_config_at(&path),
        None => Ok(false),
    }
}

pub fn reset_config_at(path: &Path) -> Result<bool, io::Error> {
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert_eq!(load_config_from(&path), None);
        assert!(!reset_config_at(&path).unwrap());

        let config = SavedConfig {
            api_url: Some("https://gym.example/api".into()),
            page_size: 25,
            accent: Accent::Magenta,
            force_client_side: true,
            start_screen: Screen::Payments,
        };
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path), Some(config));

        assert!(reset_config_at(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SavedConfig = serde_json::from_str(r#"{"accent":"green"}"#).unwrap();
        assert_eq!(config.accent, Accent::Green);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.start_screen, Screen::Students);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config_from(&path), None);
    }

    #[test]
    fn cli_overrides_saved_config() {
        let saved = SavedConfig {
            api_url: Some("http://saved/api".into()),
            page_size: 30,
            ..SavedConfig::default()
        };
        let cli = Cli {
            api_url: Some("http://cli/api".into()),
            page_size: Some(1000),
            client_side: true,
            ..Cli::default()
        };

        let settings = Settings::resolve(&cli, Some(&saved));
        assert_eq!(settings.api_url, "http://cli/api");
        assert_eq!(settings.page_size, MAX_PAGE_SIZE);
        assert!(settings.force_client_side);

        let settings = Settings::resolve(&Cli::default(), Some(&saved));
        assert_eq!(settings.api_url, "http://saved/api");
        assert_eq!(settings.page_size, 30);

        let settings = Settings::resolve(&Cli::default(), None);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn accent_cycles_and_parses() {
        assert_eq!(Accent::Red.next(), Accent::Cyan);
        assert_eq!(Accent::Cyan.prev(), Accent::Red);
        assert_eq!(Accent::from_name(" Magenta "), Some(Accent::Magenta));
        assert_eq!(Accent::from_name("plaid"), None);
    }
}
