#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width and height pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle with a top-left origin.
///
/// Which space the coordinates belong to is up to the holder; conversions
/// never rotate, shear or clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag gesture between two corner points
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (b.0 - a.0).abs(),
            height: (b.1 - a.1).abs(),
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate (y grows downward)
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Finite components and a non-negative size
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Multiply every component by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Convert from a space at `from_scale` to a space at `to_scale`
    pub fn rescale(&self, from_scale: f64, to_scale: f64) -> Self {
        self.scaled(to_scale / from_scale)
    }

    /// Authoring space → display space
    pub fn to_display(&self, zoom: f64) -> Self {
        self.rescale(1.0, zoom)
    }

    /// Display space → authoring space
    pub fn to_authoring(&self, zoom: f64) -> Self {
        self.rescale(zoom, 1.0)
    }

    /// Authoring space → extraction space
    pub fn to_extraction(&self, scale: f64) -> Self {
        self.rescale(1.0, scale)
    }

    /// Shrink by `amount` on every side. Width and height bottom out at zero.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }

    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }

    /// Whether the vertical extent lies inside `[0, height]`
    pub fn fits_vertically(&self, height: f64) -> bool {
        self.y >= 0.0 && self.bottom() <= height
    }

    /// Whether the whole rectangle lies inside a page of `size`
    pub fn fits_within(&self, size: Size) -> bool {
        self.x >= 0.0 && self.right() <= size.width && self.fits_vertically(size.height)
    }

    /// Bottom edge expressed in a bottom-left-origin page of `page_height`
    pub fn flipped_y(&self, page_height: f64) -> f64 {
        page_height - (self.y + self.height)
    }

    /// Component-wise comparison with a relative tolerance
    pub fn approx_eq(&self, other: &Rect, rel_tol: f64) -> bool {
        fn close(a: f64, b: f64, rel_tol: f64) -> bool {
            (a - b).abs() <= rel_tol * a.abs().max(b.abs()).max(1.0)
        }
        close(self.x, other.x, rel_tol)
            && close(self.y, other.y, rel_tol)
            && close(self.width, other.width, rel_tol)
            && close(self.height, other.height, rel_tol)
    }
}
