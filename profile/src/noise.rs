// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! Adding random deviates to the pixels of a grid.
//!
//! Any [`Distribution`] of the pixel type can be applied with [`add_noise`]. Every pixel of the
//! view receives one independent sample, the rest of a shared buffer is not touched.
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson, Uniform};
use sky_grid::{ImageView, Pixel};

use crate::Error;

/// Add one sample of `distribution` to every pixel of the view, row by row.
pub fn add_noise<T, D, R>(
    view: &ImageView<'_, T>,
    distribution: &D,
    rng: &mut R,
) -> Result<(), Error>
where
    T: Pixel,
    D: Distribution<T>,
    R: Rng + ?Sized,
{
    view.shade(|_, _, pix| *pix += distribution.sample(&mut *rng))?;
    Ok(())
}

/// Add normally distributed noise of the given mean and standard deviation.
pub fn add_gaussian_noise<R>(
    view: &ImageView<'_, f64>,
    mean: f64,
    sigma: f64,
    rng: &mut R,
) -> Result<(), Error>
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(mean, sigma)
        .map_err(|_| Error::InvalidParameter("gaussian noise needs a finite, non-negative sigma"))?;
    add_noise(view, &normal, rng)
}

/// Add noise uniformly distributed in `[low, high)`.
pub fn add_uniform_noise<R>(
    view: &ImageView<'_, f64>,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<(), Error>
where
    R: Rng + ?Sized,
{
    if !(low < high && low.is_finite() && high.is_finite()) {
        return Err(Error::InvalidParameter("uniform noise needs a finite range low < high"));
    }

    add_noise(view, &Uniform::new(low, high), rng)
}

/// Replace every pixel by a Poisson deviate with the pixel value as its mean.
///
/// This is the photon noise of an image holding expected counts. Pixels at or below zero are
/// left as they are.
pub fn apply_poisson_noise<R>(view: &ImageView<'_, f64>, rng: &mut R) -> Result<(), Error>
where
    R: Rng + ?Sized,
{
    let mut result = Ok(());
    view.shade(|_, _, pix| {
        if result.is_err() || *pix <= 0.0 {
            return;
        }

        match Poisson::new(*pix) {
            Ok(poisson) => *pix = poisson.sample(&mut *rng),
            Err(_) => result = Err(Error::InvalidParameter("poisson mean must be finite")),
        }
    })?;
    result
}
