//! Board configuration: grid dimensions, screen geometry and palette layout.
//!
//! Loaded from TOML; every field is optional and falls back to the defaults
//! below.
//!
//! ```toml
//! [grid]
//! width = 15
//! height = 10
//! cell_size = 48.0
//! background = "textures/core_grid.png"
//!
//! [palette]
//! cell_size = 40.0
//! gap = 24.0
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::types::Point;

/// Errors that can occur when loading or validating a board configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read board config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse board config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// The placement grid as laid out on screen
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
    /// Screen pixels per cell
    pub cell_size: f64,
    /// Screen position of the grid's top-left corner
    pub origin: Point,
    /// Texture drawn behind the grid
    pub background: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 7,
            height: 7,
            cell_size: 60.0,
            origin: Point::origin(),
            background: None,
        }
    }
}

impl GridConfig {
    /// Screen width of the whole grid
    pub fn pixel_width(&self) -> f64 {
        self.width as f64 * self.cell_size
    }

    /// Screen height of the whole grid
    pub fn pixel_height(&self) -> f64 {
        self.height as f64 * self.cell_size
    }
}

/// The palette column listing pickable parts
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Screen pixels per cell for palette previews
    pub cell_size: f64,
    /// Vertical space between palette items
    pub gap: f64,
    /// Top-left of the palette column; defaults to the right of the grid
    pub origin: Option<Point>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            gap: 24.0,
            origin: None,
        }
    }
}

/// Configuration options for the board
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub grid: GridConfig,
    pub palette: PaletteConfig,
}

impl BoardConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid.width,
                height: self.grid.height,
            });
        }
        if self.grid.cell_size <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "grid.cell_size",
                value: self.grid.cell_size,
            });
        }
        if self.palette.cell_size <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "palette.cell_size",
                value: self.palette.cell_size,
            });
        }
        Ok(())
    }

    /// Set the grid size in cells
    pub fn with_grid_size(mut self, width: usize, height: usize) -> Self {
        self.grid.width = width;
        self.grid.height = height;
        self
    }

    /// Set the grid cell size in screen pixels
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.grid.cell_size = cell_size;
        self
    }

    /// Set the screen position of the grid
    pub fn with_grid_origin(mut self, origin: Point) -> Self {
        self.grid.origin = origin;
        self
    }

    /// Set the grid background texture
    pub fn with_background(mut self, texture: impl Into<String>) -> Self {
        self.grid.background = Some(texture.into());
        self
    }

    /// Set the palette cell size in screen pixels
    pub fn with_palette_cell_size(mut self, cell_size: f64) -> Self {
        self.palette.cell_size = cell_size;
        self
    }

    /// Place the palette column explicitly
    pub fn with_palette_origin(mut self, origin: Point) -> Self {
        self.palette.origin = Some(origin);
        self
    }
}
