// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! Rendering profiles onto pixel grids.
//!
//! Pixel `(x, y)` of a grid samples the profile at `(x * scale, y * scale)`, so the pixel with
//! coordinates `(0, 0)` is at the origin. The same convention holds for Fourier space grids with
//! the sample spacing `dk` in place of the scale.
use rand::Rng;
use sky_grid::{Bounds, Complex64, ImageAlloc, ImageView};

use crate::{Error, SampleGrid, SurfaceBrightness};

/// Upper limit on the samples of the oversampled grid in [`draw_k_folded`], 1 GiB of `Complex64`.
pub const MAX_FOLDED_AREA: i64 = 1 << 26;

fn check_spacing(spacing: f64) -> Result<(), Error> {
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Err(Error::InvalidParameter("sample spacing must be positive and finite"));
    }

    Ok(())
}

/// Render a profile in real space.
///
/// Each pixel receives the surface brightness at its centre times the pixel area `scale²`, which
/// approximates the flux falling into it. Returns the total flux drawn.
pub fn draw_x<P>(profile: &P, view: &ImageView<'_, f64>, scale: f64) -> Result<f64, Error>
where
    P: SurfaceBrightness,
{
    check_spacing(scale)?;
    profile.fill_x(view, &SampleGrid::pixel_centres(view.bounds(), scale))?;

    let area = scale * scale;
    let mut drawn = 0.0;
    view.shade(|_, _, pix| {
        *pix *= area;
        drawn += *pix;
    })?;

    log::debug!("drew flux {drawn} into {}", view.bounds());
    Ok(drawn)
}

/// Render the Fourier transform of a profile with sample spacing `dk`.
pub fn draw_k<P>(profile: &P, view: &ImageView<'_, Complex64>, dk: f64) -> Result<(), Error>
where
    P: SurfaceBrightness,
{
    check_spacing(dk)?;
    profile.fill_k(view, &SampleGrid::pixel_centres(view.bounds(), dk))
}

/// Render the Fourier transform onto a grid covering `max_k`, and fold it into `target`.
///
/// The oversampled grid extends over the target and over `[-max_k, max_k]` on both axes. Its
/// content outside of the target is aliased back onto the target with [`ImageView::wrap`], which
/// is the periodic sampling that a grid with the target's size and spacing `dk` represents.
pub fn draw_k_folded<P>(profile: &P, target: &ImageView<'_, Complex64>, dk: f64) -> Result<(), Error>
where
    P: SurfaceBrightness,
{
    check_spacing(dk)?;
    let max_k = profile.max_k();
    if !max_k.is_finite() {
        return Err(Error::InvalidParameter("max_k of the profile is not finite"));
    }

    let bounds = *target.bounds();
    if !bounds.is_defined() {
        return Err(sky_grid::Error::Undefined.into());
    }

    let need = libm::ceil(max_k / dk);
    if need > f64::from(i32::MAX / 2) {
        return Err(Error::InvalidParameter("max_k is too large for the spacing dk"));
    }

    let need = need as i32;
    let padded = bounds + Bounds::new(-need, need, -need, need);
    if padded.area() > MAX_FOLDED_AREA {
        return Err(Error::InvalidParameter("oversampled fourier grid is too large, increase dk"));
    }

    log::debug!("draw_k_folded: max_k {max_k}, dk {dk}, padded {padded} for {bounds}");

    let oversampled = ImageAlloc::with_bounds(padded, Complex64::new(0.0, 0.0))?;
    draw_k(profile, &oversampled.view(), dk)?;
    let folded = oversampled.wrap(&bounds)?;
    target.copy_from(&folded.as_const())?;
    Ok(())
}

/// A good even size for a real space image of a profile with pixel `scale`.
///
/// The image spans at least one period `2π / step_k` of the profile's sampling in Fourier space.
pub fn good_image_size<P>(profile: &P, scale: f64) -> Result<i32, Error>
where
    P: SurfaceBrightness,
{
    check_spacing(scale)?;
    let step_k = profile.step_k();
    if !(step_k > 0.0 && step_k.is_finite()) {
        return Err(Error::InvalidParameter("step_k of the profile must be positive"));
    }

    let size = libm::ceil(2.0 * core::f64::consts::PI / (step_k * scale));
    if size > f64::from(i32::MAX - 1) {
        return Err(Error::InvalidParameter("image size for this scale is too large"));
    }

    let size = size as i32;
    Ok(size + (size & 1))
}

/// Shoot `n` photons from the profile and add them to the view.
///
/// Returns the flux that landed inside the view.
pub fn draw_shoot<P, R>(
    profile: &P,
    view: &ImageView<'_, f64>,
    n: usize,
    scale: f64,
    rng: &mut R,
) -> Result<f64, Error>
where
    P: SurfaceBrightness,
    R: Rng + ?Sized,
{
    check_spacing(scale)?;
    let photons = profile.shoot(n, rng)?;
    photons.add_to(view, scale)
}
