//! Syntax tree for gesture scripts

use crate::board::Point;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One host input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `press x, y`: pointer-down wherever the point lands
    Press(Point),
    /// `pick "id" [grab x, y]`: pointer-down on a palette item
    Pick {
        part: Spanned<String>,
        grab: Option<Point>,
    },
    /// `move x, y`
    Move(Point),
    Rotate,
    Mirror,
    Release,
    Clear,
}

/// A parsed script
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub commands: Vec<Spanned<Command>>,
}

impl Script {
    /// Every palette part the script names, with its span
    pub fn part_references(&self) -> impl Iterator<Item = &Spanned<String>> {
        self.commands.iter().filter_map(|c| match &c.node {
            Command::Pick { part, .. } => Some(part),
            _ => None,
        })
    }
}
