//! Output options for board SVGs

use std::path::{Path, PathBuf};

/// How a captured board frame is written out as SVG
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Margin kept around the grid, palette and stats line
    pub viewbox_padding: f64,

    /// Emit the XML prolog so the file opens on its own
    pub standalone: bool,

    /// One element per line, nested by depth
    pub pretty_print: bool,

    /// Prepended to every class the board styles use (`ba-cell`, `ba-preview`)
    pub class_prefix: Option<String>,

    /// Inline texture files as base64 data URIs instead of linking them
    pub embed_textures: bool,

    /// Directory catalog texture paths are relative to
    pub texture_root: Option<PathBuf>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 20.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("ba-".to_string()),
            embed_textures: false,
            texture_root: None,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    /// Drop the XML prolog, e.g. when the board is inlined into HTML
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Bare class names (`cell`, `occupied`)
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Embed textures, resolving their paths against `root`
    pub fn with_embedded_textures(mut self, root: impl Into<PathBuf>) -> Self {
        self.embed_textures = true;
        self.texture_root = Some(root.into());
        self
    }

    /// File to read for a catalog texture, or `None` when textures are linked
    pub fn texture_source(&self, texture: &str) -> Option<PathBuf> {
        if !self.embed_textures {
            return None;
        }
        Some(match &self.texture_root {
            Some(root) => root.join(texture),
            None => Path::new(texture).to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_link_textures_with_prefixed_classes() {
        let config = SvgConfig::default();
        assert_eq!(config.class_prefix.as_deref(), Some("ba-"));
        assert!(config.standalone && config.pretty_print);
        assert_eq!(config.texture_source("textures/valve.png"), None);
    }

    #[test]
    fn test_inline_fragment_options() {
        let config = SvgConfig::new()
            .with_viewbox_padding(0.0)
            .with_standalone(false)
            .with_pretty_print(false)
            .without_class_prefix();

        assert_eq!(config.viewbox_padding, 0.0);
        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert!(config.class_prefix.is_none());
    }

    #[test]
    fn test_texture_source_joins_root() {
        let config = SvgConfig::new().with_embedded_textures("demos");
        assert_eq!(
            config.texture_source("textures/valve.png"),
            Some(PathBuf::from("demos/textures/valve.png"))
        );

        let unrooted = SvgConfig {
            embed_textures: true,
            ..SvgConfig::default()
        };
        assert_eq!(
            unrooted.texture_source("textures/valve.png"),
            Some(PathBuf::from("textures/valve.png"))
        );
    }
}
