//! Texture alignment transforms.
//!
//! A part's texture is authored for the unrotated, unmirrored shape. This
//! module computes the 2D affine transform that keeps that bitmap pinned to
//! the shape's footprint for all eight combinations of quarter-turn rotation
//! and horizontal mirror.
//!
//! ## Transform chain
//!
//! Applied to the texture's own pixel space, innermost first:
//!
//! ```text
//! translate(tx, ty) · scale(m, 1) · rotate(θ) · scale(s) · translate(-anchor)
//! ```
//!
//! 1. move the texture anchor onto the origin,
//! 2. scale texture pixels to screen pixels (`s = cell_size / pixels_per_cell`),
//! 3. rotate clockwise by θ,
//! 4. mirror horizontally (`m = -1`) if flipped,
//! 5. shift the result back into the positive quadrant.
//!
//! The mirror is composed after the rotation, so it flips what is on screen
//! rather than flipping the source and then rotating it.
//!
//! ## Rotation Convention
//!
//! Screen coordinates have y pointing down; positive angles rotate clockwise:
//! ```text
//! x' = x·cos(θ) - y·sin(θ)
//! y' = x·sin(θ) + y·cos(θ)
//! ```

use serde::Serialize;

use super::types::{BoundingBox, Point, Rotation, TextureBinding};

/// A 2D affine transform in SVG matrix form.
///
/// ```text
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Clockwise quarter-turn rotation about the origin
    pub fn rotate(rotation: Rotation) -> Self {
        let (cos_a, sin_a) = rotation.cos_sin();
        Self {
            a: cos_a,
            b: sin_a,
            c: -sin_a,
            d: cos_a,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Compose two transforms: the result applies `inner` first, then `self`
    pub fn then(self, inner: Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    /// Axis-aligned bounds of a transformed box.
    ///
    /// Transforms the four corners and takes their bounding box. For the
    /// quarter-turn and mirror transforms used here the result is exact.
    pub fn transform_bounds(&self, bounds: &BoundingBox) -> BoundingBox {
        let corners = [
            Point::new(bounds.x, bounds.y),
            Point::new(bounds.right(), bounds.y),
            Point::new(bounds.x, bounds.bottom()),
            Point::new(bounds.right(), bounds.bottom()),
        ];
        let moved: Vec<Point> = corners.iter().map(|p| self.transform_point(*p)).collect();

        let min_x = moved.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = moved.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = moved.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = moved.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!(
            "matrix({} {} {} {} {} {})",
            num(self.a),
            num(self.b),
            num(self.c),
            num(self.d),
            num(self.e),
            num(self.f)
        )
    }
}

/// Translation that returns a rotated/mirrored footprint to the positive quadrant.
///
/// `width`/`height` are the unrotated footprint in screen pixels.
pub fn footprint_offset(width: f64, height: f64, rotation: Rotation, mirrored: bool) -> Point {
    let (tx, ty) = match (mirrored, rotation) {
        (false, Rotation::Deg0) => (0.0, 0.0),
        (false, Rotation::Deg90) => (height, 0.0),
        (false, Rotation::Deg180) => (width, height),
        (false, Rotation::Deg270) => (0.0, width),
        (true, Rotation::Deg0) => (width, 0.0),
        (true, Rotation::Deg90) => (0.0, 0.0),
        (true, Rotation::Deg180) => (0.0, height),
        (true, Rotation::Deg270) => (height, width),
    };
    Point::new(tx, ty)
}

/// The decomposed texture transform for one (rotation, mirror, scale) state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextureTransform {
    /// Footprint compensation `(tx, ty)`
    pub offset: Point,
    pub mirrored: bool,
    pub rotation: Rotation,
    /// Texture pixels to screen pixels
    pub scale: f64,
    /// Texture anchor in source pixels
    pub anchor: Point,
}

impl TextureTransform {
    /// Compute the transform that pins `binding`'s texture to a shape drawn
    /// with `cell_size` screen pixels per cell.
    pub fn new(
        binding: &TextureBinding,
        cell_size: f64,
        rotation: Rotation,
        mirrored: bool,
    ) -> Self {
        let width = binding.base_width as f64 * cell_size;
        let height = binding.base_height as f64 * cell_size;
        Self {
            offset: footprint_offset(width, height, rotation, mirrored),
            mirrored,
            rotation,
            scale: binding.scale_for(cell_size),
            anchor: binding.anchor,
        }
    }

    /// The composed matrix, mapping texture pixels to footprint-local screen pixels
    pub fn matrix(&self) -> Affine {
        let mirror = if self.mirrored { -1.0 } else { 1.0 };
        Affine::translate(self.offset.x, self.offset.y)
            .then(Affine::scale(mirror, 1.0))
            .then(Affine::rotate(self.rotation))
            .then(Affine::scale(self.scale, self.scale))
            .then(Affine::translate(-self.anchor.x, -self.anchor.y))
    }

    /// The same matrix, positioned with the footprint's top-left at `origin`
    pub fn matrix_at(&self, origin: Point) -> Affine {
        Affine::translate(origin.x, origin.y).then(self.matrix())
    }

    /// CSS `transform` value (with `transform-origin: top left`)
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}, 1) rotate({}deg) scale({}) translate({}px, {}px)",
            num(self.offset.x),
            num(self.offset.y),
            if self.mirrored { -1 } else { 1 },
            self.rotation.degrees(),
            num(self.scale),
            num(-self.anchor.x),
            num(-self.anchor.y)
        )
    }
}

/// Format a number without a negative zero
fn num(value: f64) -> String {
    format!("{}", value + 0.0)
}
