//! SVG generation from board frames

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::board::{
    Affine, BoundingBox, Frame, Highlight, PartStats, Point, Shape, TextureTransform,
};

use super::SvgConfig;

/// Height reserved under the grid for the stats line
const STATS_HEIGHT: f64 = 32.0;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
    clip_count: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            styles: vec![],
            elements: vec![],
            indent: 1,
            clip_count: 0,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, classes: &[&str]) -> String {
        let prefix = self.prefix();
        classes
            .iter()
            .map(|c| format!("{}{}", prefix, c))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Default look for every class the renderer emits
    pub fn add_default_styles(&mut self) {
        let p = self.prefix();
        self.styles.extend([
            format!(".{p}cell {{ fill: #f4f1ea; stroke: #b8b2a7; stroke-width: 1; }}"),
            format!(".{p}occupied {{ fill: #d9d2c3; }}"),
            format!(".{p}valid {{ fill: #9ed39b; }}"),
            format!(".{p}conflict {{ fill: #e89a92; }}"),
            format!(".{p}palette-cell {{ fill: #ece7dc; stroke: #b8b2a7; stroke-width: 1; }}"),
            format!(".{p}preview {{ opacity: 0.7; }}"),
            format!(".{p}preview-cell {{ fill: none; stroke: #3a6ea5; stroke-width: 2; }}"),
            format!(".{p}preview-cell.{p}conflict {{ stroke: #c0392b; }}"),
            format!(".{p}label, .{p}stats {{ font-family: sans-serif; font-size: 12px; fill: #333; }}"),
        ]);
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, classes: &[&str]) {
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            self.class_list(classes),
            x,
            y,
            w,
            h
        ));
    }

    /// Add a clip path made of square cells and return its id
    pub fn add_cell_clip(&mut self, origins: impl IntoIterator<Item = Point>, cell_size: f64) -> String {
        self.clip_count += 1;
        let id = format!("{}clip-{}", self.prefix(), self.clip_count);
        let rects: String = origins
            .into_iter()
            .map(|o| {
                format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
                    o.x, o.y, cell_size, cell_size
                )
            })
            .collect();
        self.defs
            .push(format!(r#"<clipPath id="{}">{}</clipPath>"#, id, rects));
        id
    }

    /// Add a texture image placed by `matrix`
    pub fn add_image(&mut self, href: &str, matrix: &Affine, clip: Option<&str>, classes: &[&str]) {
        let clip_attr = clip
            .map(|c| format!(r#" clip-path="url(#{})""#, c))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"{}<image class="{}" href="{}" transform="{}"{}/>"#,
            self.indent_str(),
            self.class_list(classes),
            escape_xml(href),
            matrix.to_svg(),
            clip_attr
        ));
    }

    /// Add an image stretched over a rectangle
    pub fn add_stretched_image(&mut self, href: &str, bounds: &BoundingBox, classes: &[&str]) {
        self.elements.push(format!(
            r#"{}<image class="{}" href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"/>"#,
            self.indent_str(),
            self.class_list(classes),
            escape_xml(href),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        ));
    }

    /// Add a text element
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, classes: &[&str]) {
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}">{}</text>"#,
            self.indent_str(),
            self.class_list(classes),
            x,
            y,
            escape_xml(text)
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[&str]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, i)).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, self.class_list(classes))
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        if !self.defs.is_empty() {
            svg.push_str("  <defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str("    ");
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str("  </defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a frame to an SVG string
pub fn render_svg(frame: &Frame, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_default_styles();

    if let Some(background) = &frame.background {
        let href = texture_href(background, config);
        builder.add_stretched_image(&href, &frame.grid, &["background"]);
    }

    render_cells(frame, &mut builder);

    builder.start_group(Some("overlays"), &[]);
    for overlay in &frame.overlays {
        let footprint = frame
            .cells
            .iter()
            .filter(|c| c.occupant == Some(overlay.entity))
            .map(|c| c.origin);
        let clip = builder.add_cell_clip(footprint, frame.cell_size);
        let href = texture_href(&overlay.texture, config);
        builder.add_image(
            &href,
            &overlay.transform.matrix_at(overlay.origin),
            Some(&clip),
            &["texture"],
        );
    }
    builder.end_group();

    render_palette(frame, config, &mut builder);
    render_stats(&frame.totals, &frame.grid, &mut builder);

    let mut bounds = frame.grid;
    bounds.height += STATS_HEIGHT;
    for entry in &frame.palette {
        bounds = bounds.union(&entry.bounds);
    }

    // Floating preview last so it draws on top
    if let Some(preview) = &frame.preview {
        let classes: &[&str] = if preview.feasible {
            &["preview-cell"]
        } else {
            &["preview-cell", "conflict"]
        };
        builder.start_group(Some("preview"), &["preview"]);
        for (x, y) in preview.shape.cells() {
            builder.add_rect(
                preview.origin.x + x as f64 * frame.cell_size,
                preview.origin.y + y as f64 * frame.cell_size,
                frame.cell_size,
                frame.cell_size,
                classes,
            );
        }
        if let Some(texture) = &preview.texture {
            render_texture(
                &mut builder,
                config,
                texture,
                &preview.shape,
                preview.origin,
                frame.cell_size,
                &preview.transform,
            );
        }
        builder.end_group();

        bounds = bounds.union(&BoundingBox::new(
            preview.origin.x,
            preview.origin.y,
            preview.shape.width() as f64 * frame.cell_size,
            preview.shape.height() as f64 * frame.cell_size,
        ));
    }

    builder.build(bounds)
}

fn render_cells(frame: &Frame, builder: &mut SvgBuilder) {
    builder.start_group(Some("grid"), &[]);
    for cell in &frame.cells {
        let mut classes = vec!["cell"];
        if cell.occupant.is_some() {
            classes.push("occupied");
        }
        match cell.highlight {
            Some(Highlight::Valid) => classes.push("valid"),
            Some(Highlight::Conflict) => classes.push("conflict"),
            None => {}
        }
        builder.add_rect(
            cell.origin.x,
            cell.origin.y,
            frame.cell_size,
            frame.cell_size,
            &classes,
        );
    }
    builder.end_group();
}

fn render_palette(frame: &Frame, config: &SvgConfig, builder: &mut SvgBuilder) {
    builder.start_group(Some("palette"), &[]);
    for entry in &frame.palette {
        let origin = entry.bounds.top_left();
        for (x, y) in entry.shape.cells() {
            builder.add_rect(
                origin.x + x as f64 * frame.palette_cell_size,
                origin.y + y as f64 * frame.palette_cell_size,
                frame.palette_cell_size,
                frame.palette_cell_size,
                &["palette-cell"],
            );
        }
        if let Some(texture) = &entry.texture {
            render_texture(
                builder,
                config,
                texture,
                &entry.shape,
                origin,
                frame.palette_cell_size,
                &entry.transform,
            );
        }
        builder.add_text(
            &entry.name,
            entry.bounds.right() + 8.0,
            entry.bounds.y + 12.0,
            &["label"],
        );
    }
    builder.end_group();
}

fn render_texture(
    builder: &mut SvgBuilder,
    config: &SvgConfig,
    texture: &str,
    shape: &Shape,
    origin: Point,
    cell_size: f64,
    transform: &TextureTransform,
) {
    let footprint = shape.cells().map(|(x, y)| {
        Point::new(
            origin.x + x as f64 * cell_size,
            origin.y + y as f64 * cell_size,
        )
    });
    let clip = builder.add_cell_clip(footprint, cell_size);
    let href = texture_href(texture, config);
    builder.add_image(&href, &transform.matrix_at(origin), Some(&clip), &["texture"]);
}

fn render_stats(totals: &PartStats, grid: &BoundingBox, builder: &mut SvgBuilder) {
    let line = format!(
        "power {}  control {}  malfunction risk {}  price {}",
        totals.power, totals.control, totals.malfunction_risk, totals.price
    );
    builder.add_text(&line, grid.x, grid.bottom() + STATS_HEIGHT * 0.6, &["stats"]);
}

/// Resolve a texture reference to an `href` value
fn texture_href(path: &str, config: &SvgConfig) -> String {
    let Some(resolved) = config.texture_source(path) else {
        return path.to_string();
    };
    match std::fs::read(&resolved) {
        Ok(bytes) => format!("data:{};base64,{}", mime_type(path), STANDARD.encode(bytes)),
        Err(err) => {
            tracing::warn!(texture = %resolved.display(), error = %err, "cannot embed texture, linking instead");
            path.to_string()
        }
    }
}

fn mime_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
