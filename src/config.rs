use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_image_extensions() -> Vec<String> {
    vec![
        "jpg".to_string(),
        "jpeg".to_string(),
        "png".to_string(),
        "gif".to_string(),
        "webp".to_string(),
        "bmp".to_string(),
    ]
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageProtocol {
    #[default]
    Auto,
    Sixel,
    Kitty,
    ITerm2,
    Halfblocks,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub protocol: ImageProtocol,

    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

fn default_thumbnail_size() -> u32 {
    256
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            protocol: ImageProtocol::default(),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported card images are written to.
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,

    /// Filename prefix; exports are named `<prefix>-<epoch millis>.png`.
    #[serde(default = "default_export_prefix")]
    pub prefix: String,

    /// Capture upscale factor for exported cards.
    #[serde(default = "default_export_upscale")]
    pub upscale: f32,
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_export_prefix() -> String {
    "mybag-card".to_string()
}

fn default_export_upscale() -> f32 {
    3.0
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
            prefix: default_export_prefix(),
            upscale: default_export_upscale(),
        }
    }
}

/// Startup values for the background gradient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme_start")]
    pub start: String,

    #[serde(default = "default_theme_end")]
    pub end: String,

    #[serde(default = "default_theme_angle")]
    pub angle: u16,

    #[serde(default = "default_theme_split")]
    pub split: u8,
}

fn default_theme_start() -> String {
    "#ffdde1".to_string()
}

fn default_theme_end() -> String {
    "#ee9ca7".to_string()
}

fn default_theme_angle() -> u16 {
    135
}

fn default_theme_split() -> u8 {
    50
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            start: default_theme_start(),
            end: default_theme_end(),
            angle: default_theme_angle(),
            split: default_theme_split(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mybag")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
