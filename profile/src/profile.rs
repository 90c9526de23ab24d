// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! The evaluation contract shared by all profiles.
use alloc::vec::Vec;

use rand::Rng;
use sky_grid::{Bounds, Complex64, ImageView};

use crate::{Deconvolve, Error, Gaussian, PhotonArray, Position, Shapelet};

/// A linear map from pixel offsets to sample positions.
///
/// The pixel at column offset `i` and row offset `j`, counted from the minimum corner of the
/// destination grid, is sampled at
///
/// > `x = x0 + i * dx + j * dxy`, `y = y0 + j * dy + i * dyx`
///
/// The same map describes real space positions and Fourier space wave vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleGrid {
    pub x0: f64,
    pub dx: f64,
    pub dxy: f64,
    pub y0: f64,
    pub dy: f64,
    pub dyx: f64,
}

impl SampleGrid {
    /// A grid aligned with the axes, without shear terms.
    pub const fn aligned(x0: f64, dx: f64, y0: f64, dy: f64) -> Self {
        SampleGrid {
            x0,
            dx,
            dxy: 0.0,
            y0,
            dy,
            dyx: 0.0,
        }
    }

    /// Pixel centres at `(x * scale, y * scale)` for the pixels of `bounds`.
    pub fn pixel_centres(bounds: &Bounds, scale: f64) -> Self {
        SampleGrid::aligned(
            f64::from(bounds.xmin) * scale,
            scale,
            f64::from(bounds.ymin) * scale,
            scale,
        )
    }

    /// Whether `x` only depends on the column and `y` only on the row.
    pub fn is_aligned(&self) -> bool {
        self.dxy == 0.0 && self.dyx == 0.0
    }

    pub fn position(&self, i: usize, j: usize) -> Position {
        let (i, j) = (i as f64, j as f64);
        Position::new(
            self.x0 + i * self.dx + j * self.dxy,
            self.y0 + j * self.dy + i * self.dyx,
        )
    }

    /// The `x` of each column, for an aligned grid.
    pub(crate) fn columns(&self, ncol: usize) -> Vec<f64> {
        (0..ncol).map(|i| self.x0 + i as f64 * self.dx).collect()
    }

    /// The `y` of each row, for an aligned grid.
    pub(crate) fn rows(&self, nrow: usize) -> Vec<f64> {
        (0..nrow).map(|j| self.y0 + j as f64 * self.dy).collect()
    }
}

/// Explicit sample positions for every pixel of a grid, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Coords {
    positions: Vec<Position>,
    ncol: usize,
    nrow: usize,
}

impl Coords {
    /// Evaluate the map for an `ncol` by `nrow` grid.
    pub fn new(grid: &SampleGrid, ncol: usize, nrow: usize) -> Self {
        let mut positions = Vec::with_capacity(ncol * nrow);
        for j in 0..nrow {
            positions.extend((0..ncol).map(|i| grid.position(i, j)));
        }

        Coords {
            positions,
            ncol,
            nrow,
        }
    }

    /// Coordinates for the pixels of a view.
    pub fn for_view<T>(grid: &SampleGrid, view: &ImageView<'_, T>) -> Self {
        Coords::new(grid, view.ncol() as usize, view.nrow() as usize)
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// The position at column offset `i` and row offset `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<Position> {
        if i >= self.ncol {
            return None;
        }

        self.positions.get(j * self.ncol + i).copied()
    }
}

/// Visit the pixels of a view with their offsets from the minimum corner.
///
/// The first error returned by `f` stops all further evaluation and is returned.
pub(crate) fn shade_offsets<T: Copy>(
    view: &ImageView<'_, T>,
    mut f: impl FnMut(usize, usize) -> Result<T, Error>,
) -> Result<(), Error> {
    let bounds = *view.bounds();
    let mut result = Ok(());
    view.shade(|x, y, pix| {
        if result.is_err() {
            return;
        }

        let (i, j) = ((x - bounds.xmin) as usize, (y - bounds.ymin) as usize);
        match f(i, j) {
            Ok(value) => *pix = value,
            Err(err) => result = Err(err),
        }
    })?;
    result
}

/// Check that explicit coordinates were created for the view.
fn coords_match<T>(view: &ImageView<'_, T>, coords: &Coords) -> Result<(), Error> {
    if view.ncol() as usize != coords.ncol() || view.nrow() as usize != coords.nrow() {
        return Err(Error::InvalidParameter("coordinates do not match the grid shape"));
    }

    Ok(())
}

/// A surface brightness profile, evaluable in real space and in Fourier space.
///
/// The Fourier convention is `F(k) = ∫ f(x) exp(-i k·x) dx`, such that `F(0)` is the flux.
///
/// Only pointwise evaluation and the summary quantities are required. The bulk fills are provided
/// in terms of the pointwise methods, and the variants override them with faster versions where
/// the structure of the profile permits.
pub trait SurfaceBrightness {
    /// The surface brightness at a position.
    ///
    /// Fails with [`Error::NotAnalytic`] for profiles that only exist in Fourier space.
    fn x_value(&self, pos: Position) -> Result<f64, Error>;

    /// The Fourier transform at a wave vector.
    fn k_value(&self, k: Position) -> Result<Complex64, Error>;

    /// The integral over the whole plane.
    fn flux(&self) -> f64;

    /// The flux weighted mean position.
    fn centroid(&self) -> Position;

    /// The wave number beyond which the Fourier transform is negligible.
    fn max_k(&self) -> f64;

    /// The Fourier sampling interval at which folding stays below the accepted threshold.
    fn step_k(&self) -> f64;

    fn is_axisymmetric(&self) -> bool;

    fn has_hard_edges(&self) -> bool {
        false
    }

    fn is_analytic_x(&self) -> bool {
        true
    }

    fn is_analytic_k(&self) -> bool {
        true
    }

    /// Fill the pixels of a view with real space samples.
    fn fill_x(&self, view: &ImageView<'_, f64>, grid: &SampleGrid) -> Result<(), Error> {
        self.fill_x_coords(view, &Coords::for_view(grid, view))
    }

    /// Fill the pixels of a view with Fourier space samples.
    fn fill_k(&self, view: &ImageView<'_, Complex64>, grid: &SampleGrid) -> Result<(), Error> {
        self.fill_k_coords(view, &Coords::for_view(grid, view))
    }

    /// Fill a view from explicit real space positions, one per pixel.
    fn fill_x_coords(&self, view: &ImageView<'_, f64>, coords: &Coords) -> Result<(), Error> {
        coords_match(view, coords)?;
        shade_offsets(view, |i, j| match coords.get(i, j) {
            Some(pos) => self.x_value(pos),
            None => Err(Error::InvalidParameter("coordinates do not match the grid shape")),
        })
    }

    /// Fill a view from explicit wave vectors, one per pixel.
    fn fill_k_coords(&self, view: &ImageView<'_, Complex64>, coords: &Coords) -> Result<(), Error> {
        coords_match(view, coords)?;
        shade_offsets(view, |i, j| match coords.get(i, j) {
            Some(k) => self.k_value(k),
            None => Err(Error::InvalidParameter("coordinates do not match the grid shape")),
        })
    }

    /// Draw `n` photons from the profile, together carrying its flux.
    fn shoot<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<PhotonArray, Error> {
        let _ = (n, rng);
        Err(Error::Unsupported("this profile", "photon shooting"))
    }
}

/// One of the supported profiles.
#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    Shapelet(Shapelet),
    Gaussian(Gaussian),
    Deconvolve(Deconvolve),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $call:expr) => {
        match $self {
            Profile::Shapelet($inner) => $call,
            Profile::Gaussian($inner) => $call,
            Profile::Deconvolve($inner) => $call,
        }
    };
}

impl SurfaceBrightness for Profile {
    fn x_value(&self, pos: Position) -> Result<f64, Error> {
        dispatch!(self, p => p.x_value(pos))
    }

    fn k_value(&self, k: Position) -> Result<Complex64, Error> {
        dispatch!(self, p => p.k_value(k))
    }

    fn flux(&self) -> f64 {
        dispatch!(self, p => p.flux())
    }

    fn centroid(&self) -> Position {
        dispatch!(self, p => p.centroid())
    }

    fn max_k(&self) -> f64 {
        dispatch!(self, p => p.max_k())
    }

    fn step_k(&self) -> f64 {
        dispatch!(self, p => p.step_k())
    }

    fn is_axisymmetric(&self) -> bool {
        dispatch!(self, p => p.is_axisymmetric())
    }

    fn has_hard_edges(&self) -> bool {
        dispatch!(self, p => p.has_hard_edges())
    }

    fn is_analytic_x(&self) -> bool {
        dispatch!(self, p => p.is_analytic_x())
    }

    fn is_analytic_k(&self) -> bool {
        dispatch!(self, p => p.is_analytic_k())
    }

    fn fill_x(&self, view: &ImageView<'_, f64>, grid: &SampleGrid) -> Result<(), Error> {
        dispatch!(self, p => p.fill_x(view, grid))
    }

    fn fill_k(&self, view: &ImageView<'_, Complex64>, grid: &SampleGrid) -> Result<(), Error> {
        dispatch!(self, p => p.fill_k(view, grid))
    }

    fn fill_x_coords(&self, view: &ImageView<'_, f64>, coords: &Coords) -> Result<(), Error> {
        dispatch!(self, p => p.fill_x_coords(view, coords))
    }

    fn fill_k_coords(&self, view: &ImageView<'_, Complex64>, coords: &Coords) -> Result<(), Error> {
        dispatch!(self, p => p.fill_k_coords(view, coords))
    }

    fn shoot<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<PhotonArray, Error> {
        dispatch!(self, p => p.shoot(n, rng))
    }
}

impl From<Shapelet> for Profile {
    fn from(profile: Shapelet) -> Self {
        Profile::Shapelet(profile)
    }
}

impl From<Gaussian> for Profile {
    fn from(profile: Gaussian) -> Self {
        Profile::Gaussian(profile)
    }
}

impl From<Deconvolve> for Profile {
    fn from(profile: Deconvolve) -> Self {
        Profile::Deconvolve(profile)
    }
}

#[test]
fn sheared_grid_positions() {
    let grid = SampleGrid {
        x0: -1.0,
        dx: 0.5,
        dxy: 0.25,
        y0: 2.0,
        dy: -0.5,
        dyx: 0.125,
    };
    assert!(!grid.is_aligned());
    assert_eq!(grid.position(0, 0), Position::new(-1.0, 2.0));
    assert_eq!(grid.position(2, 1), Position::new(0.25, 1.75));

    let coords = Coords::new(&grid, 3, 2);
    assert_eq!(coords.get(2, 1), Some(grid.position(2, 1)));
    assert_eq!(coords.get(3, 0), None);
    assert_eq!(coords.get(0, 2), None);
}
