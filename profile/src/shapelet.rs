// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! Cartesian Hermite–Gauss shapelets.
//!
//! The one dimensional basis functions are the orthonormal Hermite functions
//!
//! > `φ_n(u) = (2^n n! √π)^(-1/2) H_n(u) exp(-u²/2)`
//!
//! which are evaluated with their three-term recurrence instead of through the polynomials. Each
//! basis function is, up to a phase, its own Fourier transform, which makes the Fourier space
//! evaluation as cheap as the real space one.
use alloc::vec::Vec;
use core::f64::consts::PI;

use rand::Rng;
use sky_grid::{Complex64, ImageView};

use crate::profile::shade_offsets;
use crate::{Coords, Error, PhotonArray, Position, RenderParams, SampleGrid, SurfaceBrightness};

/// `π^(-1/4)`, the peak of the zeroth Hermite function.
const PI_MINUS_QUARTER: f64 = 0.751_125_544_464_942_5;

/// A weighted sum of two-dimensional Hermite–Gauss functions of scale `sigma`.
///
/// With `N` the order, the profile is
///
/// > `f(x, y) = (1/σ²) Σ b[n1, n2] φ_n1(x/σ) φ_n2(y/σ)`, for `n1 + n2 ≤ N`.
///
/// The flux only depends on the coefficients, not on the scale.
///
/// The coefficients are ordered by total order `n = n1 + n2` and within one order by `n2`, so the
/// coefficient of `(n1, n2)` is found at [`Shapelet::index`]. There are `(N+1)(N+2)/2` of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Shapelet {
    sigma: f64,
    order: usize,
    bvec: Vec<f64>,
    params: RenderParams,
}

impl Shapelet {
    /// Create a shapelet from its scale and coefficients, with default render parameters.
    ///
    /// Fails with [`Error::InvalidParameter`] if `sigma` is not positive and finite, or if the
    /// number of coefficients is not that of a complete order.
    pub fn new(sigma: f64, bvec: impl Into<Vec<f64>>) -> Result<Self, Error> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(Error::InvalidParameter("shapelet sigma must be positive and finite"));
        }

        let bvec = bvec.into();
        let order = order_for_len(bvec.len()).ok_or(Error::InvalidParameter(
            "shapelet coefficient count must be (N+1)(N+2)/2",
        ))?;

        Ok(Shapelet {
            sigma,
            order,
            bvec,
            params: RenderParams::default(),
        })
    }

    /// Replace the render parameters.
    pub fn with_params(mut self, params: RenderParams) -> Result<Self, Error> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    /// The position of the coefficient of `(n1, n2)` in the coefficient vector.
    pub const fn index(n1: usize, n2: usize) -> usize {
        let n = n1 + n2;
        n * (n + 1) / 2 + n2
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The highest total order `n1 + n2` with a coefficient.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn bvec(&self) -> &[f64] {
        &self.bvec
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// The coefficient of `(n1, n2)`, if within the order.
    pub fn coefficient(&self, n1: usize, n2: usize) -> Option<f64> {
        if n1 + n2 > self.order {
            return None;
        }

        self.bvec.get(Shapelet::index(n1, n2)).copied()
    }

    /// `Σ b[n1, n2] a[n1] c[n2]` for basis values along both axes.
    fn contract(&self, a: &[f64], c: &[f64]) -> f64 {
        let mut sum = 0.0;
        for n in 0..=self.order {
            for n2 in 0..=n {
                sum += self.bvec[Shapelet::index(n - n2, n2)] * a[n - n2] * c[n2];
            }
        }
        sum
    }

    /// As `contract`, weighting each total order by the Fourier phase `(-i)^n`.
    fn contract_phased(&self, a: &[f64], c: &[f64]) -> Complex64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for n in 0..=self.order {
            let mut order_sum = 0.0;
            for n2 in 0..=n {
                order_sum += self.bvec[Shapelet::index(n - n2, n2)] * a[n - n2] * c[n2];
            }
            sum += phase(n) * order_sum;
        }
        sum
    }

    /// Basis values at `u * factor` for every `u`, one row of `order + 1` values each.
    fn basis_table(&self, us: &[f64], factor: f64) -> Vec<f64> {
        let width = self.order + 1;
        let mut table = alloc::vec![0.0; us.len() * width];
        for (u, row) in us.iter().zip(table.chunks_exact_mut(width)) {
            hermite(u * factor, row);
        }
        table
    }

    /// The same table with the phase `(-i)^n` applied.
    fn phased_table(&self, us: &[f64], factor: f64) -> Vec<Complex64> {
        let width = self.order + 1;
        self.basis_table(us, factor)
            .chunks_exact(width)
            .flat_map(|row| row.iter().enumerate().map(|(n, &v)| phase(n) * v))
            .collect()
    }
}

/// The order `N` such that `(N+1)(N+2)/2 == len`.
fn order_for_len(len: usize) -> Option<usize> {
    let mut order = 0;
    loop {
        let complete = (order + 1) * (order + 2) / 2;
        if complete == len {
            return Some(order);
        } else if complete > len {
            return None;
        }
        order += 1;
    }
}

/// `(-i)^n`.
fn phase(n: usize) -> Complex64 {
    match n % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, -1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, 1.0),
    }
}

/// Fill `out` with `φ_0(u), ..., φ_{len-1}(u)`.
fn hermite(u: f64, out: &mut [f64]) {
    let Some(first) = out.first_mut() else {
        return;
    };

    *first = PI_MINUS_QUARTER * libm::exp(-0.5 * u * u);
    if out.len() > 1 {
        out[1] = core::f64::consts::SQRT_2 * u * out[0];
    }

    for n in 1..out.len().saturating_sub(1) {
        let m = n as f64;
        out[n + 1] =
            libm::sqrt(2.0 / (m + 1.0)) * u * out[n] - libm::sqrt(m / (m + 1.0)) * out[n - 1];
    }
}

/// `∫ φ_n(u) du` for `n < len`, zero for every odd order.
fn integrals(len: usize) -> Vec<f64> {
    let mut integrals = alloc::vec![0.0; len];
    if let Some(first) = integrals.first_mut() {
        *first = libm::sqrt(2.0 * PI) * PI_MINUS_QUARTER;
    }

    for n in (0..len.saturating_sub(2)).step_by(2) {
        let m = n as f64;
        integrals[n + 2] = libm::sqrt((m + 1.0) / (m + 2.0)) * integrals[n];
    }
    integrals
}

/// `∫ u φ_n(u) du` for `n < len`, zero for every even order.
fn first_moments(len: usize) -> Vec<f64> {
    let integrals = integrals(len + 1);
    (0..len)
        .map(|n| {
            let m = n as f64;
            let below = if n > 0 { integrals[n - 1] } else { 0.0 };
            libm::sqrt((m + 1.0) / 2.0) * integrals[n + 1] + libm::sqrt(m / 2.0) * below
        })
        .collect()
}

impl SurfaceBrightness for Shapelet {
    fn x_value(&self, pos: Position) -> Result<f64, Error> {
        let mut px = alloc::vec![0.0; self.order + 1];
        let mut py = px.clone();
        hermite(pos.x / self.sigma, &mut px);
        hermite(pos.y / self.sigma, &mut py);
        Ok(self.contract(&px, &py) / (self.sigma * self.sigma))
    }

    fn k_value(&self, k: Position) -> Result<Complex64, Error> {
        let mut px = alloc::vec![0.0; self.order + 1];
        let mut py = px.clone();
        hermite(k.x * self.sigma, &mut px);
        hermite(k.y * self.sigma, &mut py);
        Ok(self.contract_phased(&px, &py) * (2.0 * PI))
    }

    fn flux(&self) -> f64 {
        let integrals = integrals(self.order + 1);
        self.contract(&integrals, &integrals)
    }

    fn centroid(&self) -> Position {
        let flux = self.flux();
        if flux == 0.0 {
            return Position::origin();
        }

        let integrals = integrals(self.order + 1);
        let moments = first_moments(self.order + 1);
        let scale = self.sigma / flux;
        Position::new(
            self.contract(&moments, &integrals) * scale,
            self.contract(&integrals, &moments) * scale,
        )
    }

    fn max_k(&self) -> f64 {
        let order = (self.order + 1) as f64;
        self.params.maxk_radius() / self.sigma * libm::sqrt(order)
    }

    fn step_k(&self) -> f64 {
        let order = (self.order + 1) as f64;
        let radius = self.params.folding_radius().max(4.0);
        PI / (radius * self.sigma * libm::sqrt(order))
    }

    fn is_axisymmetric(&self) -> bool {
        false
    }

    fn fill_x(&self, view: &ImageView<'_, f64>, grid: &SampleGrid) -> Result<(), Error> {
        if !grid.is_aligned() {
            return self.fill_x_coords(view, &Coords::for_view(grid, view));
        }

        let (ncol, nrow) = (view.ncol() as usize, view.nrow() as usize);
        let width = self.order + 1;
        let inv_sigma = 1.0 / self.sigma;
        let columns = self.basis_table(&grid.columns(ncol), inv_sigma);
        let rows = self.basis_table(&grid.rows(nrow), inv_sigma);

        // Coefficients contracted with the basis of the current row, indexed by n1.
        let mut row_coeffs = alloc::vec![0.0; width];
        let mut current = None;
        shade_offsets(view, |i, j| {
            if current != Some(j) {
                let py = &rows[j * width..][..width];
                for (n1, coeff) in row_coeffs.iter_mut().enumerate() {
                    *coeff = (0..width - n1)
                        .map(|n2| self.bvec[Shapelet::index(n1, n2)] * py[n2])
                        .sum();
                }
                current = Some(j);
            }

            let px = &columns[i * width..][..width];
            let value: f64 = row_coeffs.iter().zip(px).map(|(c, p)| c * p).sum();
            Ok(value * inv_sigma * inv_sigma)
        })
    }

    fn fill_k(&self, view: &ImageView<'_, Complex64>, grid: &SampleGrid) -> Result<(), Error> {
        if !grid.is_aligned() {
            return self.fill_k_coords(view, &Coords::for_view(grid, view));
        }

        let (ncol, nrow) = (view.ncol() as usize, view.nrow() as usize);
        let width = self.order + 1;
        let norm = 2.0 * PI;
        let columns = self.phased_table(&grid.columns(ncol), self.sigma);
        let rows = self.phased_table(&grid.rows(nrow), self.sigma);

        let mut row_coeffs = alloc::vec![Complex64::new(0.0, 0.0); width];
        let mut current = None;
        shade_offsets(view, |i, j| {
            if current != Some(j) {
                let py = &rows[j * width..][..width];
                for (n1, coeff) in row_coeffs.iter_mut().enumerate() {
                    *coeff = (0..width - n1)
                        .map(|n2| py[n2] * self.bvec[Shapelet::index(n1, n2)])
                        .sum();
                }
                current = Some(j);
            }

            let px = &columns[i * width..][..width];
            let value: Complex64 = row_coeffs.iter().zip(px).map(|(c, p)| c * p).sum();
            Ok(value * norm)
        })
    }

    fn fill_x_coords(&self, view: &ImageView<'_, f64>, coords: &Coords) -> Result<(), Error> {
        let mut px = alloc::vec![0.0; self.order + 1];
        let mut py = px.clone();
        shade_offsets(view, |i, j| {
            let pos = coords
                .get(i, j)
                .ok_or(Error::InvalidParameter("coordinates do not match the grid shape"))?;
            hermite(pos.x / self.sigma, &mut px);
            hermite(pos.y / self.sigma, &mut py);
            Ok(self.contract(&px, &py) / (self.sigma * self.sigma))
        })
    }

    fn fill_k_coords(&self, view: &ImageView<'_, Complex64>, coords: &Coords) -> Result<(), Error> {
        let mut px = alloc::vec![0.0; self.order + 1];
        let mut py = px.clone();
        let norm = 2.0 * PI;
        shade_offsets(view, |i, j| {
            let k = coords
                .get(i, j)
                .ok_or(Error::InvalidParameter("coordinates do not match the grid shape"))?;
            hermite(k.x * self.sigma, &mut px);
            hermite(k.y * self.sigma, &mut py);
            Ok(self.contract_phased(&px, &py) * norm)
        })
    }

    fn shoot<R: Rng + ?Sized>(&self, _: usize, _: &mut R) -> Result<PhotonArray, Error> {
        Err(Error::Unsupported("shapelet", "photon shooting"))
    }
}

#[test]
fn triangular_lengths() {
    assert_eq!(order_for_len(1), Some(0));
    assert_eq!(order_for_len(3), Some(1));
    assert_eq!(order_for_len(6), Some(2));
    assert_eq!(order_for_len(10), Some(3));
    assert_eq!(order_for_len(0), None);
    assert_eq!(order_for_len(4), None);
    assert_eq!(Shapelet::index(0, 0), 0);
    assert_eq!(Shapelet::index(1, 0), 1);
    assert_eq!(Shapelet::index(0, 1), 2);
    assert_eq!(Shapelet::index(2, 0), 3);
    assert_eq!(Shapelet::index(0, 2), 5);
}

#[test]
fn recurrence_matches_closed_form() {
    let mut phi = [0.0; 4];
    for u in [-2.5, -0.3, 0.0, 1.0, 3.7] {
        hermite(u, &mut phi);
        let g = PI_MINUS_QUARTER * libm::exp(-0.5 * u * u);
        let expected = [
            g,
            core::f64::consts::SQRT_2 * u * g,
            (2.0 * u * u - 1.0) / core::f64::consts::SQRT_2 * g,
            (2.0 * u * u * u - 3.0 * u) / libm::sqrt(3.0) * g,
        ];
        for (got, want) in phi.iter().zip(expected) {
            assert!((got - want).abs() < 1e-14, "{got} != {want} at {u}");
        }
    }
}

#[test]
fn moments_of_low_orders() {
    let integrals = integrals(5);
    let i0 = libm::sqrt(2.0) * libm::pow(PI, 0.25);
    assert!((integrals[0] - i0).abs() < 1e-14);
    assert_eq!(integrals[1], 0.0);
    assert!((integrals[2] - i0 / libm::sqrt(2.0)).abs() < 1e-14);
    assert_eq!(integrals[3], 0.0);

    // ∫ u φ_1 = √2 ∫ u² φ_0 = √2 I_0
    let moments = first_moments(3);
    assert_eq!(moments[0], 0.0);
    assert!((moments[1] - core::f64::consts::SQRT_2 * i0).abs() < 1e-14);
    assert_eq!(moments[2], 0.0);
}
