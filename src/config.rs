//! `storm.json` settings

use crate::storm::StormParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "storm.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Startup settings. Grid contents are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StormConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Screen pixels per cell edge
    pub cell_size: u32,
    /// Fixed seed for reproducible storms
    pub rng_seed: Option<u64>,
    pub auto_strike: bool,
    pub params: StormParams,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            grid_width: 200,
            grid_height: 150,
            cell_size: 4,
            rng_seed: None,
            auto_strike: false,
            params: StormParams::default(),
        }
    }
}

impl StormConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(Self {
            params: config.params.sanitized(),
            ..config
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid("grid dimensions must be non-zero"));
        }
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be non-zero"));
        }
        if self.pixel_size().is_none() {
            return Err(ConfigError::Invalid("grid size times cell_size overflows the window"));
        }
        Ok(())
    }

    fn pixel_size(&self) -> Option<(u32, u32)> {
        let w = u32::try_from(self.grid_width).ok()?.checked_mul(self.cell_size)?;
        let h = u32::try_from(self.grid_height).ok()?.checked_mul(self.cell_size)?;
        // both dimensions also feed i32 pixel coordinates
        (i32::try_from(w).is_ok() && i32::try_from(h).is_ok()).then_some((w, h))
    }

    /// Window size in pixels; saturates for configs that fail `validate`
    pub fn window_size(&self) -> (u32, u32) {
        self.pixel_size().unwrap_or((u32::MAX, u32::MAX))
    }
}
