use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::render::Palette;
use crate::GridInt;

// A single row or column would step the head onto itself
const MIN_GRID_SIDE: GridInt = 2;
const MAX_GRID_SIDE: GridInt = 255;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Game settings. Missing keys in a config file fall back to the defaults,
/// which match a 640x480 board of 20px cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_width: GridInt,
    pub grid_height: GridInt,
    pub ticks_per_second: u32,
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: 32,
            grid_height: 24,
            ticks_per_second: 10,
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: GameConfig =
            serde_yaml_ng::from_str(content).context("Failed to deserialize config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to serialize config")
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<()> {
        if self.grid_width < MIN_GRID_SIDE || self.grid_height < MIN_GRID_SIDE {
            bail!(
                "Grid must be at least {0}x{0}, got {1}x{2}",
                MIN_GRID_SIDE, self.grid_width, self.grid_height
            );
        }
        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            bail!(
                "Grid sides are limited to {} cells, got {}x{}",
                MAX_GRID_SIDE, self.grid_width, self.grid_height
            );
        }
        if self.ticks_per_second == 0 {
            bail!("ticks_per_second must be positive");
        }
        Ok(())
    }
}
