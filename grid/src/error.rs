// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use core::fmt;

use crate::Bounds;

/// The axis along which an access left the valid range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Column,
    Row,
}

/// Failures of grid operations.
///
/// All of these are local and synchronous. An operation that returns an error has not modified
/// any pixel or any addressing state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The grid has undefined bounds and therefore no memory.
    #[error("attempt to access values of an undefined image")]
    Undefined,
    /// A coordinate, or an edge of a rectangle, lies outside the valid range.
    #[error("attempt to access {axis} number {value}, range is {min} to {max}")]
    OutOfBounds {
        axis: Axis,
        value: i32,
        min: i32,
        max: i32,
    },
    /// A point lies outside the valid range along both axes.
    #[error("attempt to access column number {x} and row number {y}, bounds are {bounds}")]
    OutsideBoth { x: i32, y: i32, bounds: Bounds },
    /// A rectangle claims to be defined but describes no addressable memory.
    #[error("attempt to create an image with defined but invalid bounds {0}")]
    InvalidBounds(Bounds),
    /// Two grids with differing width or height.
    #[error("bounds {ours} and {theirs} are not the same shape")]
    ShapeMismatch { ours: Bounds, theirs: Bounds },
    /// Externally provided memory can not hold the requested strided layout.
    #[error("invalid layout of external memory: {0}")]
    InvalidLayout(&'static str),
}

impl Error {
    /// Describe the axes on which `(x, y)` violates `bounds`.
    pub(crate) fn out_of_bounds(x: i32, y: i32, bounds: &Bounds) -> Self {
        let column = x < bounds.xmin || x > bounds.xmax;
        let row = y < bounds.ymin || y > bounds.ymax;
        if column && row {
            Error::OutsideBoth {
                x,
                y,
                bounds: *bounds,
            }
        } else if column {
            Error::OutOfBounds {
                axis: Axis::Column,
                value: x,
                min: bounds.xmin,
                max: bounds.xmax,
            }
        } else {
            Error::OutOfBounds {
                axis: Axis::Row,
                value: y,
                min: bounds.ymin,
                max: bounds.ymax,
            }
        }
    }

    /// Describe the first edge of `inner` that lies outside of `outer`.
    pub(crate) fn not_included(inner: &Bounds, outer: &Bounds) -> Self {
        if !inner.is_defined() {
            return Error::InvalidBounds(*inner);
        }

        if inner.xmin < outer.xmin {
            Error::out_of_bounds(inner.xmin, outer.ymin, outer)
        } else if inner.xmax > outer.xmax {
            Error::out_of_bounds(inner.xmax, outer.ymin, outer)
        } else if inner.ymin < outer.ymin {
            Error::out_of_bounds(outer.xmin, inner.ymin, outer)
        } else {
            Error::out_of_bounds(outer.xmin, inner.ymax, outer)
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Column => "column",
            Axis::Row => "row",
        })
    }
}

#[test]
fn names_axis_and_range() {
    let bounds = Bounds::new(1, 4, 1, 3);
    let err = Error::out_of_bounds(2, 7, &bounds);
    assert_eq!(
        err,
        Error::OutOfBounds {
            axis: Axis::Row,
            value: 7,
            min: 1,
            max: 3
        }
    );

    let message = alloc::format!("{err}");
    assert_eq!(message, "attempt to access row number 7, range is 1 to 3");

    let err = Error::out_of_bounds(0, 9, &bounds);
    assert_eq!(
        alloc::format!("{err}"),
        "attempt to access column number 0 and row number 9, bounds are Bounds(1,4,1,3)"
    );
}
