//! Gesture scripts: a small line-oriented language that replays host input
//! against the drag controller without a GUI.

pub mod ast;
mod grammar;
pub mod lexer;
pub mod runner;

pub use ast::*;
pub use grammar::parse;
pub use runner::{cell_center, check, run};

/// Quick reference printed by `--grammar`
pub const REFERENCE: &str = r#"Gesture script reference

  press X, Y                 pointer-down at a screen point (palette item or grid)
  pick "ID"                  pointer-down on a palette item, grabbed at its top-left
  pick "ID" grab DX, DY      ... grabbed at an offset inside the palette item
  move X, Y                  pointer move
  rotate                     rotate the dragged part a quarter turn clockwise
  mirror                     mirror the dragged part horizontally
  release                    pointer-up: place the part if it fits, otherwise drop it
  clear                      remove every placed part (ignored while dragging)

Coordinates are screen pixels and may be negative or fractional.
Comments: // to end of line, /* block */.
"#;
