use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::intensity::engine::DEFAULT_SECTIONS;
use crate::intensity::{NormalizationMode, ReferenceStrategy};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_sections")]
    pub sections: usize,
    #[serde(default)]
    pub mode: NormalizationMode,
    #[serde(default)]
    pub reference: ReferenceStrategy,
    /// Worker threads for section analysis; 0 lets rayon decide.
    #[serde(default)]
    pub jobs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            mode: NormalizationMode::default(),
            reference: ReferenceStrategy::default(),
            jobs: 0,
        }
    }
}

fn default_sections() -> usize { DEFAULT_SECTIONS }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Invalid config {}: {}", path.display(), e);
            None
        }
    }
}

/// `./heft.toml`, then `~/.config/heft/config.toml`, then the platform config dir.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("heft.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("heft").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("heft").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
