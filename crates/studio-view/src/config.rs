//! Diagram view configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Zoom level every recentering starts from, in percent
pub const BASELINE_ZOOM: f64 = 100.0;

/// Diagram grid spacing in canvas units
pub const DEFAULT_GRID_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub grid_size: u32,
    /// Users cannot drag nodes on a locked diagram
    pub locked: bool,
    /// Zoom level applied before recentering, in percent
    pub baseline_zoom: f64,
    /// Fraction of the visible width where a focused node's center lands
    pub horizontal_anchor: f64,
    /// Fraction of the visible height where a focused node's center lands
    pub vertical_anchor: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            locked: true,
            baseline_zoom: BASELINE_ZOOM,
            horizontal_anchor: 1.0 / 3.0,
            vertical_anchor: 0.5,
        }
    }
}

impl ViewConfig {
    /// Load a configuration file; missing keys take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> studio_io::Result<Self> {
        studio_io::load_json(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> studio_io::Result<()> {
        studio_io::save_json(self, path)
    }
}
