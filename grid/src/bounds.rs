// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use core::{fmt, ops};

/// An inclusive, axis-aligned integer rectangle.
///
/// This is the addressing unit for all grids. Both edges are part of the rectangle so that
/// `Bounds::new(1, 4, 1, 4)` describes sixteen pixels.
///
/// Next to its four edges a rectangle carries whether it is *defined*. The undefined rectangle has
/// no valid coordinates at all and a grid over it owns no memory. Note that this is distinct from
/// any single-pixel rectangle, the smallest defined one.
///
/// The edges are public, similar to a stride specification, so a caller may build a rectangle that
/// claims to be defined while its area is not positive. Operations that allocate memory for such a
/// rectangle fail with [`Error::InvalidBounds`](crate::Error::InvalidBounds).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub xmin: i32,
    pub xmax: i32,
    pub ymin: i32,
    pub ymax: i32,
    defined: bool,
}

impl Bounds {
    /// Construct a rectangle from its edges.
    ///
    /// The rectangle is undefined if the minimum exceeds the maximum along either axis.
    pub const fn new(xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Self {
        Bounds {
            xmin,
            xmax,
            ymin,
            ymax,
            defined: xmin <= xmax && ymin <= ymax,
        }
    }

    /// A rectangle that is defined regardless of its edges.
    ///
    /// Used to report sizes that were requested as defined but can not describe any pixels.
    pub(crate) const fn claimed(xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Self {
        Bounds {
            xmin,
            xmax,
            ymin,
            ymax,
            defined: true,
        }
    }

    /// The rectangle without any coordinates.
    pub const fn undefined() -> Self {
        Bounds {
            xmin: 0,
            xmax: 0,
            ymin: 0,
            ymax: 0,
            defined: false,
        }
    }

    /// A rectangle covering exactly one pixel.
    pub const fn from_point(x: i32, y: i32) -> Self {
        Bounds::new(x, x, y, y)
    }

    pub const fn is_defined(&self) -> bool {
        self.defined
    }

    /// The number of columns, `0` for the undefined rectangle.
    pub fn width(&self) -> i64 {
        if self.defined {
            i64::from(self.xmax) - i64::from(self.xmin) + 1
        } else {
            0
        }
    }

    /// The number of rows, `0` for the undefined rectangle.
    pub fn height(&self) -> i64 {
        if self.defined {
            i64::from(self.ymax) - i64::from(self.ymin) + 1
        } else {
            0
        }
    }

    /// The number of pixels described by the rectangle.
    ///
    /// Computed in `i64`, so this can not overflow for any edges. It is only non-positive for the
    /// undefined rectangle or if the edges were modified to contradict the defined state.
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// The shape as `(rows, columns)`.
    pub fn shape(&self) -> (i64, i64) {
        (self.height(), self.width())
    }

    /// Test whether a pixel lies within the rectangle.
    pub fn includes(&self, x: i32, y: i32) -> bool {
        self.defined && self.xmin <= x && x <= self.xmax && self.ymin <= y && y <= self.ymax
    }

    /// Test whether another rectangle is completely contained in this one.
    ///
    /// The undefined rectangle is not included in anything, and nothing is included in it.
    pub fn includes_bounds(&self, other: &Bounds) -> bool {
        self.defined
            && other.defined
            && self.xmin <= other.xmin
            && other.xmax <= self.xmax
            && self.ymin <= other.ymin
            && other.ymax <= self.ymax
    }

    /// Compare width and height, independent of the offset.
    pub fn is_same_shape_as(&self, other: &Bounds) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }

    /// The central pixel, rounding towards the minimum edges.
    pub fn center(&self) -> Option<(i32, i32)> {
        if !self.defined {
            return None;
        }

        let cx = (i64::from(self.xmin) + i64::from(self.xmax)).div_euclid(2);
        let cy = (i64::from(self.ymin) + i64::from(self.ymax)).div_euclid(2);
        // Between two i32 values, so it fits.
        Some((cx as i32, cy as i32))
    }

    /// Grow the rectangle by `border` pixels on every side.
    ///
    /// A negative border shrinks the rectangle, possibly making it undefined.
    pub fn with_border(&self, border: i32) -> Self {
        if !self.defined {
            return *self;
        }

        Bounds::new(
            self.xmin - border,
            self.xmax + border,
            self.ymin - border,
            self.ymax + border,
        )
    }

    /// Move the rectangle by an offset.
    pub fn shift(&self, dx: i32, dy: i32) -> Self {
        Bounds {
            xmin: self.xmin + dx,
            xmax: self.xmax + dx,
            ymin: self.ymin + dy,
            ymax: self.ymax + dy,
            defined: self.defined,
        }
    }

    /// Grow (or shrink) the rectangle by a factor about its center.
    ///
    /// The extent along each axis is scaled and rounded up to whole pixels on both sides.
    pub fn expand(&self, factor: f64) -> Self {
        if !self.defined {
            return *self;
        }

        let grow = |extent: i64| {
            let delta = (extent as f64) * (factor - 1.0) / 2.0;
            // Round half-pixels outwards, a ceiling without depending on `std`.
            let whole = delta as i64;
            if (whole as f64) < delta {
                whole + 1
            } else {
                whole
            }
        };

        let dx = grow(self.width()) as i32;
        let dy = grow(self.height()) as i32;
        Bounds::new(self.xmin - dx, self.xmax + dx, self.ymin - dy, self.ymax + dy)
    }

    /// Extend the rectangle to include a pixel.
    pub fn include_point(&mut self, x: i32, y: i32) {
        if !self.defined {
            *self = Bounds::from_point(x, y);
            return;
        }

        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::undefined()
    }
}

/// The intersection of two rectangles.
impl ops::BitAnd for Bounds {
    type Output = Bounds;

    fn bitand(self, other: Bounds) -> Bounds {
        if !self.defined || !other.defined {
            return Bounds::undefined();
        }

        let overlap = Bounds::new(
            self.xmin.max(other.xmin),
            self.xmax.min(other.xmax),
            self.ymin.max(other.ymin),
            self.ymax.min(other.ymax),
        );

        if overlap.defined {
            overlap
        } else {
            Bounds::undefined()
        }
    }
}

/// The bounding box of two rectangles.
impl ops::AddAssign for Bounds {
    fn add_assign(&mut self, other: Bounds) {
        if !other.defined {
            return;
        }

        self.include_point(other.xmin, other.ymin);
        self.include_point(other.xmax, other.ymax);
    }
}

impl ops::Add for Bounds {
    type Output = Bounds;

    fn add(mut self, other: Bounds) -> Bounds {
        self += other;
        self
    }
}

/// Extend to include a pixel given as `(x, y)`.
impl ops::AddAssign<(i32, i32)> for Bounds {
    fn add_assign(&mut self, (x, y): (i32, i32)) {
        self.include_point(x, y);
    }
}

impl fmt::Debug for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defined {
            write!(
                f,
                "Bounds({},{},{},{})",
                self.xmin, self.xmax, self.ymin, self.ymax
            )
        } else {
            f.write_str("Bounds(undefined)")
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[test]
fn defined_state() {
    assert!(Bounds::new(1, 1, 1, 1).is_defined());
    assert_eq!(Bounds::new(1, 1, 1, 1).area(), 1);
    assert!(!Bounds::new(2, 1, 1, 1).is_defined());
    assert!(!Bounds::undefined().is_defined());
    assert_eq!(Bounds::undefined().area(), 0);
    assert!(!Bounds::undefined().includes(0, 0));
}

#[test]
fn inclusion() {
    let b = Bounds::new(1, 4, -2, 3);
    assert_eq!(b.area(), 24);
    assert_eq!(b.shape(), (6, 4));
    assert!(b.includes(1, -2));
    assert!(b.includes(4, 3));
    assert!(!b.includes(5, 0));
    assert!(!b.includes(2, -3));
    assert!(b.includes_bounds(&Bounds::new(2, 3, 0, 0)));
    assert!(b.includes_bounds(&b));
    assert!(!b.includes_bounds(&Bounds::new(0, 3, 0, 0)));
    assert!(!b.includes_bounds(&Bounds::undefined()));
}

#[test]
fn same_shape_ignores_offset() {
    let a = Bounds::new(1, 4, 1, 3);
    assert!(a.is_same_shape_as(&a.shift(10, -7)));
    assert!(!a.is_same_shape_as(&Bounds::new(1, 3, 1, 4)));
}

#[test]
fn set_operations() {
    let a = Bounds::new(0, 10, 0, 10);
    let b = Bounds::new(5, 15, -5, 5);
    assert_eq!(a & b, Bounds::new(5, 10, 0, 5));
    assert!(!(a & Bounds::new(20, 30, 0, 1)).is_defined());
    assert_eq!(a + b, Bounds::new(0, 15, -5, 10));

    let mut grown = Bounds::undefined();
    grown += (3, 4);
    grown += (-1, 7);
    assert_eq!(grown, Bounds::new(-1, 3, 4, 7));
}

#[test]
fn border_and_expand() {
    let a = Bounds::new(1, 4, 1, 4);
    assert_eq!(a.with_border(2), Bounds::new(-1, 6, -1, 6));
    assert_eq!(a.expand(2.0), Bounds::new(-1, 6, -1, 6));
    assert_eq!(a.expand(1.0), a);
    assert_eq!(a.center(), Some((2, 2)));
    assert_eq!(Bounds::undefined().center(), None);
}
