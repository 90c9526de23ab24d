// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use alloc::vec::Vec;

use sky_grid::ImageView;

use crate::{Error, Position};

/// A set of photons, each with a position and a flux.
///
/// Produced by [`SurfaceBrightness::shoot`](crate::SurfaceBrightness::shoot), the photons
/// together carry the flux of the profile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotonArray {
    x: Vec<f64>,
    y: Vec<f64>,
    flux: Vec<f64>,
}

impl PhotonArray {
    /// An array of `n` photons at the origin, without flux.
    pub fn new(n: usize) -> Self {
        PhotonArray {
            x: alloc::vec![0.0; n],
            y: alloc::vec![0.0; n],
            flux: alloc::vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Overwrite the photon at `index`.
    ///
    /// # Panics
    /// If the index is not less than [`len`](Self::len).
    pub fn set_photon(&mut self, index: usize, pos: Position, flux: f64) {
        self.x[index] = pos.x;
        self.y[index] = pos.y;
        self.flux[index] = flux;
    }

    pub fn position(&self, index: usize) -> Option<Position> {
        Some(Position::new(*self.x.get(index)?, *self.y.get(index)?))
    }

    pub fn flux(&self, index: usize) -> Option<f64> {
        self.flux.get(index).copied()
    }

    /// The sum of the flux of all photons.
    pub fn total_flux(&self) -> f64 {
        self.flux.iter().sum()
    }

    /// Multiply the flux of every photon.
    pub fn scale_flux(&mut self, factor: f64) {
        self.flux.iter_mut().for_each(|flux| *flux *= factor);
    }

    /// Accumulate the photons into the pixels of a view.
    ///
    /// A photon at `(x, y)` lands in the pixel whose centre `(i * scale, j * scale)` is closest.
    /// Photons outside of the view's bounds are dropped. Returns the flux that was added.
    pub fn add_to(&self, view: &ImageView<'_, f64>, scale: f64) -> Result<f64, Error> {
        if !(scale > 0.0) {
            return Err(Error::InvalidParameter("pixel scale must be positive"));
        }

        if !view.is_defined() {
            return Err(sky_grid::Error::Undefined.into());
        }

        let bounds = *view.bounds();
        let mut added = 0.0;
        for ((&x, &y), &flux) in self.x.iter().zip(&self.y).zip(&self.flux) {
            let i = libm::floor(x / scale + 0.5);
            let j = libm::floor(y / scale + 0.5);
            // Also rejects NaN, and anything beyond the range of `i32`.
            let inside = |v: f64, min: i32, max: i32| v >= f64::from(min) && v <= f64::from(max);
            if !inside(i, bounds.xmin, bounds.xmax) || !inside(j, bounds.ymin, bounds.ymax) {
                continue;
            }

            let (i, j) = (i as i32, j as i32);
            view.set_value(i, j, view.at(i, j)? + flux)?;
            added += flux;
        }

        log::debug!("added {added} of {} to {bounds}", self.total_flux());
        Ok(added)
    }
}

#[test]
fn lands_in_nearest_pixel() {
    use sky_grid::{Bounds, ImageAlloc};

    let image = ImageAlloc::with_bounds(Bounds::new(-2, 2, -2, 2), 0.0).unwrap();
    let mut photons = PhotonArray::new(4);
    photons.set_photon(0, Position::new(0.24, -0.26), 1.0);
    photons.set_photon(1, Position::new(0.26, 0.0), 2.0);
    photons.set_photon(2, Position::new(-1.0, 0.9), 4.0);
    // Outside, dropped.
    photons.set_photon(3, Position::new(1.3, 0.0), 8.0);

    let added = photons.add_to(&image.view(), 0.5).unwrap();
    assert_eq!(added, 7.0);
    assert_eq!(photons.total_flux(), 15.0);
    assert_eq!(image.at(0, -1), Ok(1.0));
    assert_eq!(image.at(1, 0), Ok(2.0));
    assert_eq!(image.at(-2, 2), Ok(4.0));
}
