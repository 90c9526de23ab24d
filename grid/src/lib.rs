// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! # Grid
//!
//! Two-dimensional pixel grids for rendering synthetic astronomical images.
//!
//! A grid is addressed by an inclusive integer rectangle, [`Bounds`], and stores its samples in a
//! reference counted [`PixelBuffer`]. Any number of views may share one buffer, each with its own
//! bounds, column `step` and row `stride`. Steps may be negative, which is how flipped views are
//! represented, and a view never copies pixels when it is narrowed to a sub-rectangle.
//!
//! There are three capability levels over the same memory:
//!
//! - [`ConstImageView`], a read-only view.
//! - [`ImageView`], a view that may write to the shared pixels.
//! - [`ImageAlloc`], the owning grid which additionally may resize and reallocate its buffer.
//!
//! Views observe each other's writes immediately. There is no copy-on-write and no internal
//! synchronization; the buffer is `!Send` and `!Sync`.
//!
//! ## Usage
//!
//! ```
//! use sky_grid::{Bounds, ImageAlloc};
//!
//! let mut image = ImageAlloc::with_bounds(Bounds::new(1, 4, 1, 4), 2.0f64).unwrap();
//! assert_eq!(image.sum_elements().unwrap(), 32.0);
//!
//! let stamp = image.sub_image(&Bounds::new(2, 3, 2, 3)).unwrap();
//! stamp.fill(5.0).unwrap();
//! assert_eq!(image.at(2, 2).unwrap(), 5.0);
//! ```
//!
//! Oversampled Fourier renders are brought down to the detector with [`ImageView::wrap`], which
//! folds the content of the whole view periodically into a target rectangle.
// Be std for doctests and unit tests, avoids a weird warning about missing allocator.
#![cfg_attr(not(any(test, doctest)), no_std)]
// Shared pixel memory is expressed with `Cell` slices, nothing here needs `unsafe`.
#![deny(unsafe_code)]
extern crate alloc;

mod bounds;
mod buf;
mod error;
mod image;
mod pixel;
mod wrap;

pub use self::bounds::Bounds;
pub use self::buf::{PixelBuffer, Storage};
pub use self::error::{Axis, Error};
pub use self::image::{ConstImageView, ImageAlloc, ImageView};
pub use self::pixel::Pixel;

/// Complex double precision samples, the element kind of Fourier space grids.
pub use num_complex::Complex64;
