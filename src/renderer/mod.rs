//! SVG renderer for board frames
//!
//! This module takes a [`Frame`](crate::board::Frame) and produces an SVG
//! string with appropriate CSS classes for styling.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::render_svg;
