// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use alloc::vec::Vec;
use core::f64::consts::PI;

use rand::Rng;
use sky_grid::{Complex64, ImageView};

use crate::profile::shade_offsets;
use crate::{Coords, Error, PhotonArray, Position, RenderParams, SampleGrid, SurfaceBrightness};

/// A round Gaussian centred at the origin.
///
/// > `f(r) = flux / (2π σ²) exp(-r² / 2σ²)`, `F(k) = flux exp(-k² σ² / 2)`
#[derive(Clone, Debug, PartialEq)]
pub struct Gaussian {
    sigma: f64,
    flux: f64,
    params: RenderParams,
}

impl Gaussian {
    /// Fails with [`Error::InvalidParameter`] unless `sigma` is positive and `flux` is finite.
    pub fn new(sigma: f64, flux: f64) -> Result<Self, Error> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(Error::InvalidParameter("gaussian sigma must be positive and finite"));
        }

        if !flux.is_finite() {
            return Err(Error::InvalidParameter("gaussian flux must be finite"));
        }

        Ok(Gaussian {
            sigma,
            flux,
            params: RenderParams::default(),
        })
    }

    pub fn with_params(mut self, params: RenderParams) -> Result<Self, Error> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// `exp(-u² / 2)` at every `u * factor`.
    fn profile_1d(us: &[f64], factor: f64) -> Vec<f64> {
        us.iter()
            .map(|u| {
                let v = u * factor;
                libm::exp(-0.5 * v * v)
            })
            .collect()
    }
}

impl SurfaceBrightness for Gaussian {
    fn x_value(&self, pos: Position) -> Result<f64, Error> {
        let norm = self.flux / (2.0 * PI * self.sigma * self.sigma);
        Ok(norm * libm::exp(-0.5 * pos.norm_sqr() / (self.sigma * self.sigma)))
    }

    fn k_value(&self, k: Position) -> Result<Complex64, Error> {
        let value = self.flux * libm::exp(-0.5 * k.norm_sqr() * self.sigma * self.sigma);
        Ok(Complex64::new(value, 0.0))
    }

    fn flux(&self) -> f64 {
        self.flux
    }

    fn centroid(&self) -> Position {
        Position::origin()
    }

    fn max_k(&self) -> f64 {
        self.params.maxk_radius() / self.sigma
    }

    fn step_k(&self) -> f64 {
        PI / (self.params.folding_radius().max(4.0) * self.sigma)
    }

    fn is_axisymmetric(&self) -> bool {
        true
    }

    fn fill_x(&self, view: &ImageView<'_, f64>, grid: &SampleGrid) -> Result<(), Error> {
        if !grid.is_aligned() {
            return self.fill_x_coords(view, &Coords::for_view(grid, view));
        }

        let inv_sigma = 1.0 / self.sigma;
        let norm = self.flux / (2.0 * PI * self.sigma * self.sigma);
        let columns = Gaussian::profile_1d(&grid.columns(view.ncol() as usize), inv_sigma);
        let rows = Gaussian::profile_1d(&grid.rows(view.nrow() as usize), inv_sigma);
        shade_offsets(view, |i, j| Ok(norm * columns[i] * rows[j]))
    }

    fn fill_k(&self, view: &ImageView<'_, Complex64>, grid: &SampleGrid) -> Result<(), Error> {
        if !grid.is_aligned() {
            return self.fill_k_coords(view, &Coords::for_view(grid, view));
        }

        let columns = Gaussian::profile_1d(&grid.columns(view.ncol() as usize), self.sigma);
        let rows = Gaussian::profile_1d(&grid.rows(view.nrow() as usize), self.sigma);
        shade_offsets(view, |i, j| {
            Ok(Complex64::new(self.flux * columns[i] * rows[j], 0.0))
        })
    }

    /// Photons are drawn with the Box–Muller transform and share the flux equally.
    fn shoot<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<PhotonArray, Error> {
        let mut photons = PhotonArray::new(n);
        if n == 0 {
            return Ok(photons);
        }

        let flux = self.flux / n as f64;
        for index in 0..n {
            // In (0, 1], keeps the logarithm finite.
            let u1 = 1.0 - rng.gen::<f64>();
            let u2 = rng.gen::<f64>();
            let r = self.sigma * libm::sqrt(-2.0 * libm::log(u1));
            let (sin, cos) = libm::sincos(2.0 * PI * u2);
            photons.set_photon(index, Position::new(r * cos, r * sin), flux);
        }

        log::trace!("shot {n} photons from gaussian of sigma {}", self.sigma);
        Ok(photons)
    }
}

#[test]
fn peak_and_transform() {
    let g = Gaussian::new(2.0, 3.0).unwrap();
    let peak = g.x_value(Position::origin()).unwrap();
    assert!((peak - 3.0 / (8.0 * PI)).abs() < 1e-15);
    assert_eq!(g.k_value(Position::origin()), Ok(Complex64::new(3.0, 0.0)));

    let k = Position::new(0.3, -0.4);
    let expected = 3.0 * libm::exp(-0.5 * 0.25 * 4.0);
    assert!((g.k_value(k).unwrap().re - expected).abs() < 1e-15);
    assert!(g.is_axisymmetric());
    assert!(Gaussian::new(0.0, 1.0).is_err());
    assert!(Gaussian::new(1.0, f64::INFINITY).is_err());
}
