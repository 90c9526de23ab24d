// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! # Profile
//!
//! Surface brightness profiles and their rendering onto [`sky_grid`] pixel grids.
//!
//! Every profile implements [`SurfaceBrightness`]. It can be evaluated pointwise in real space
//! (where it is analytic there) and in Fourier space, and it can fill a whole grid at once from a
//! linear mapping of pixel offsets to positions, a [`SampleGrid`]. The bulk fills are where the
//! work happens; profiles override them to exploit separability, the provided versions evaluate
//! each pixel independently.
//!
//! The closed set of profiles is collected in [`Profile`]:
//!
//! - [`Shapelet`], a weighted sum of two-dimensional Hermite–Gauss basis functions.
//! - [`Gaussian`], the round Gaussian.
//! - [`Deconvolve`], the Fourier space inverse of another profile.
//!
//! The [`draw`] module ties profiles and grids together: rendering in real space, rendering an
//! oversampled Fourier image and folding it down, and shooting photons. Rendered images are
//! made noisy with the [`noise`] module.
//!
//! ## Usage
//!
//! ```
//! use sky_grid::{Bounds, ImageAlloc};
//! use sky_profile::{draw, Shapelet, SurfaceBrightness};
//!
//! // The zeroth order shapelet is a Gaussian.
//! let profile = Shapelet::new(1.5, [1.0]).unwrap();
//! let image = ImageAlloc::with_bounds(Bounds::new(-16, 16, -16, 16), 0.0).unwrap();
//!
//! let drawn = draw::draw_x(&profile, &image.view(), 0.5).unwrap();
//! assert!((drawn - profile.flux()).abs() < 1e-6 * profile.flux());
//! ```
// Be std for doctests and unit tests, avoids a weird warning about missing allocator.
#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod deconvolve;
pub mod draw;
mod error;
mod gaussian;
pub mod noise;
mod params;
mod photon;
mod position;
mod profile;
mod shapelet;

pub use self::deconvolve::Deconvolve;
pub use self::error::Error;
pub use self::gaussian::Gaussian;
pub use self::params::RenderParams;
pub use self::photon::PhotonArray;
pub use self::position::Position;
pub use self::profile::{Coords, Profile, SampleGrid, SurfaceBrightness};
pub use self::shapelet::Shapelet;
