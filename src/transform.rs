//! Conversions between the normalized drawing space ([-1,1] on both axes,
//! +y up) and the pixel viewport (integer rect with inclusive bounds, +y
//! down), plus normalized <-> 8-bit color. Everything here is stateless;
//! inputs are assumed finite and a zero-area viewport divides by zero on
//! purpose (callers keep the surface non-degenerate).

/// A point in normalized drawing space, both components conventionally
/// in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Uniform scale of both components about the origin.
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Pixel position of this point inside `viewport`. The normalized
    /// y axis points up while pixel y grows downward, so y is negated.
    /// No clamping: off-viewport results are legal (off-screen labels).
    pub fn to_viewport(self, viewport: Viewport) -> PixelPoint {
        let center = viewport.center();
        PixelPoint {
            x: center.x + self.x * viewport.width as f64 / 2.0,
            y: center.y - self.y * viewport.height as f64 / 2.0,
        }
    }
}

/// A point in pixel space. Kept as f64 so the round trip through
/// [`NormPoint::to_viewport`] is exact up to floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Inverse of [`NormPoint::to_viewport`] for the same viewport.
    pub fn to_normalized(self, viewport: Viewport) -> NormPoint {
        let center = viewport.center();
        NormPoint {
            x: (self.x - center.x) / (viewport.width as f64 / 2.0),
            y: -(self.y - center.y) / (viewport.height as f64 / 2.0),
        }
    }
}

/// Pixel-space rectangle with integer inclusive bounds: a viewport of
/// width 400 at left 0 spans columns 0..=399.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub const fn right(self) -> i32 {
        self.left + self.width - 1
    }

    pub const fn bottom(self) -> i32 {
        self.top + self.height - 1
    }

    /// Center of the rect. The "+1" compensates for the inclusive right
    /// and bottom edges; a 400-wide viewport at left 0 centers on 200.0,
    /// not 199.5.
    pub fn center(self) -> PixelPoint {
        PixelPoint {
            x: (self.left + self.right() + 1) as f64 / 2.0,
            y: (self.top + self.bottom() + 1) as f64 / 2.0,
        }
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn to_normalized(self) -> NormColor3 {
        NormColor3 {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
        }
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color4 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_normalized(self) -> NormColor4 {
        NormColor4 {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
            a: self.a as f64 / 255.0,
        }
    }
}

/// RGB color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormColor3 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl NormColor3 {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Per-channel `value * 255`, truncated rather than rounded.
    /// Downstream consumers depend on the exact truncated values.
    pub fn to_color(self) -> Color {
        Color {
            r: (self.r * 255.0) as u8,
            g: (self.g * 255.0) as u8,
            b: (self.b * 255.0) as u8,
        }
    }

    /// Promote to RGBA with fully-opaque alpha.
    pub const fn with_alpha(self, a: f64) -> NormColor4 {
        NormColor4 {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// RGBA color with channels in [0, 1]. A missing alpha defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormColor4 {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for NormColor4 {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

impl NormColor4 {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color(self) -> Color4 {
        Color4 {
            r: (self.r * 255.0) as u8,
            g: (self.g * 255.0) as u8,
            b: (self.b * 255.0) as u8,
            a: (self.a * 255.0) as u8,
        }
    }
}

/// Texture coordinate ([0,1]) to normalized axis value ([-1,1]).
/// No clamping; the caller guarantees the domain.
pub fn texture_coord_to_norm(a: f64) -> f64 {
    a * 2.0 - 1.0
}

/// Normalized axis value ([-1,1]) to texture coordinate ([0,1]).
pub fn norm_to_texture_coord(a: f64) -> f64 {
    (a + 1.0) / 2.0
}
