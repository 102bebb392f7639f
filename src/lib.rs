//! Block Assembler - a placement engine for polyomino parts on a grid
//!
//! Parts from a catalog are dragged onto a rectangular grid, rotated and
//! mirrored in flight, and committed only where they fit. Each part carries a
//! texture that stays pinned to its cells through every orientation.
//!
//! Interaction is driven either programmatically through
//! [`DragController`] or by replaying a gesture script.
//!
//! # Example
//!
//! ```rust
//! use block_assembler::{render, Catalog};
//!
//! let catalog = Catalog::from_json(r#"[{ "id": "bar", "shape": [[1, 1]] }]"#).unwrap();
//! let svg = render(r#"pick "bar" move 60, 60 release"#, &catalog).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod board;
pub mod catalog;
pub mod error;
pub mod renderer;
pub mod script;

pub use board::{
    BoardConfig, BoardGeometry, ConfigError, DragController, DragEffect, DragEvent,
    DragTransition, Frame, OccupancyGrid, PartStats, PlacedEntity, Shape, TextureTransform,
};
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use error::ScriptError;
pub use renderer::{render_svg, SvgConfig};
pub use script::{parse, Script};

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during the assemble pipeline
#[derive(Debug, Error)]
pub enum AssembleError {
    /// Error in the gesture script
    #[error("script errors: {}", format_script_errors(.0))]
    Script(Vec<ScriptError>),

    /// Error loading or selecting from the catalog
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Invalid board configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<Vec<ScriptError>> for AssembleError {
    fn from(errors: Vec<ScriptError>) -> Self {
        AssembleError::Script(errors)
    }
}

impl From<ScriptError> for AssembleError {
    fn from(error: ScriptError) -> Self {
        AssembleError::Script(vec![error])
    }
}

fn format_script_errors(errors: &[ScriptError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete assemble pipeline
#[derive(Debug, Clone, Default)]
pub struct AssembleConfig {
    /// Grid and palette geometry
    pub board: BoardConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Catalog ids offered in the palette; `None` offers the whole catalog
    pub selection: Option<Vec<String>>,
    /// Debug mode: dump the board to stderr after the script runs
    pub debug: bool,
}

impl AssembleConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board configuration
    pub fn with_board(mut self, config: BoardConfig) -> Self {
        self.board = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Offer only the given parts in the palette
    pub fn with_selection<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.selection = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// The board after a script has run, with every step it took
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub frame: Frame,
    pub transitions: Vec<DragTransition>,
}

/// Replay a gesture script against a fresh board
///
/// # Example
///
/// ```rust
/// use block_assembler::{assemble, AssembleConfig, BoardConfig, Catalog};
///
/// let catalog = Catalog::from_json(r#"[
///     { "id": "bar", "price": 5, "shape": [[1, 1]] },
///     { "id": "dot", "price": 1, "shape": [[1]] }
/// ]"#).unwrap();
/// let config = AssembleConfig::new()
///     .with_board(BoardConfig::new().with_grid_size(4, 4).with_cell_size(10.0))
///     .with_selection(["bar"]);
///
/// let assembly = assemble(r#"pick "bar" move 0, 0 release"#, &catalog, &config).unwrap();
/// assert_eq!(assembly.frame.totals.price, 5.0);
/// assert_eq!(assembly.frame.palette.len(), 1);
/// ```
pub fn assemble(
    source: &str,
    catalog: &Catalog,
    config: &AssembleConfig,
) -> Result<Assembly, AssembleError> {
    config.board.validate()?;

    let selected = match &config.selection {
        Some(ids) => catalog.select(ids)?,
        None => catalog.clone(),
    };

    let script = parse(source)?;

    let geometry = BoardGeometry::new(
        &config.board,
        selected.palette().map(CatalogEntry::palette_item),
    );
    let mut controller = DragController::new(config.board.grid.clone());
    let transitions = script::run(&script, &mut controller, &selected, &geometry)?;

    if config.debug {
        eprintln!("=== Board Debug ===");
        eprint!("{}", board_dump(&controller.occupancy()));
        for entity in controller.entities() {
            eprintln!(
                "{} {} at {} rot={} mirrored={}",
                entity.id, entity.catalog_id, entity.position, entity.rotation, entity.mirrored
            );
        }
        eprintln!("===================");
    }

    let frame = Frame::capture(&controller, &selected, &geometry);
    Ok(Assembly { frame, transitions })
}

/// Replay a script with the default configuration and render it to SVG
pub fn render(source: &str, catalog: &Catalog) -> Result<String, AssembleError> {
    render_with_config(source, catalog, &AssembleConfig::default())
}

/// Replay a script and render the resulting board to SVG
pub fn render_with_config(
    source: &str,
    catalog: &Catalog,
    config: &AssembleConfig,
) -> Result<String, AssembleError> {
    let assembly = assemble(source, catalog, config)?;
    Ok(render_svg(&assembly.frame, &config.svg))
}

/// One line per row, `.` for free cells and the owner id otherwise
fn board_dump(grid: &OccupancyGrid) -> String {
    let mut out = String::new();
    for (cell, owner) in grid.iter() {
        match owner {
            Some(id) => out.push_str(&format!("{:>3}", id.0)),
            None => out.push_str("  ."),
        }
        if cell.x as usize + 1 == grid.width() {
            out.push('\n');
        }
    }
    out
}
