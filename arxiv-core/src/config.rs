use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

pub const SERVER_URL_ENV: &str = "ARXIV_AGENT_SERVER_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub theme: ThemeConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server_url: String,
    pub base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background_color: [u8; 3],
    pub panel_color: [u8; 3],
    pub accent_color: [u8; 3],
    pub text_color: [u8; 3],
    pub secondary_text_color: [u8; 3],
    pub border_color: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub font_size: f32,
    pub window_width: f32,
    pub window_height: f32,
    pub notice_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_owned(),
            base_path: "/api".to_owned(),
        }
    }
}

impl ApiConfig {
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.base_path.trim_matches('/')
        )
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            // Light theme with an emerald accent
            background_color: [249, 250, 251],
            panel_color: [255, 255, 255],
            accent_color: [16, 185, 129],
            text_color: [31, 41, 55],
            secondary_text_color: [107, 114, 128],
            border_color: [229, 231, 235],
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            window_width: 1100.0,
            window_height: 800.0,
            notice_seconds: 3,
        }
    }
}

impl UiConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }
}

impl AppConfig {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("arxiv-agent");
        Ok(dir)
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Loads the user config, falling back to (and writing out) the defaults
    /// when it is missing or unreadable. The server URL environment variable
    /// always wins.
    pub fn load() -> Self {
        let mut config = match Self::config_file_path() {
            Ok(path) => Self::load_or_init(&path),
            Err(e) => {
                warn!(error = %e, "using default configuration");
                Self::default()
            }
        };
        config.apply_env_overrides(std::env::var(SERVER_URL_ENV).ok());
        config
    }

    pub fn load_or_init(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "could not load configuration, using defaults");
                let config = Self::default();
                if let Err(save_err) = config.save_to(path) {
                    warn!(error = %save_err, path = %path.display(), "could not write default configuration");
                }
                config
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self, server_url: Option<String>) {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            info!(%url, "server URL overridden from environment");
            self.api.server_url = url.trim().to_owned();
        }
    }
}

// Color helpers for the GUI
impl ThemeConfig {
    fn rgb(c: [u8; 3]) -> egui::Color32 {
        egui::Color32::from_rgb(c[0], c[1], c[2])
    }

    pub fn background_color32(&self) -> egui::Color32 {
        Self::rgb(self.background_color)
    }

    pub fn panel_color32(&self) -> egui::Color32 {
        Self::rgb(self.panel_color)
    }

    pub fn accent_color32(&self) -> egui::Color32 {
        Self::rgb(self.accent_color)
    }

    pub fn text_color32(&self) -> egui::Color32 {
        Self::rgb(self.text_color)
    }

    pub fn secondary_text_color32(&self) -> egui::Color32 {
        Self::rgb(self.secondary_text_color)
    }

    pub fn border_color32(&self) -> egui::Color32 {
        Self::rgb(self.border_color)
    }
}
