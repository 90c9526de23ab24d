// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use alloc::boxed::Box;

use rand::Rng;
use sky_grid::{Complex64, ImageView};

use crate::{
    Coords, Error, PhotonArray, Position, Profile, RenderParams, SampleGrid, SurfaceBrightness,
};

/// The inverse of another profile in Fourier space.
///
/// Convolving with a deconvolution cancels the adaptee. This only exists in Fourier space: the
/// inverse grows where the adaptee decays, so it is cut to zero beyond the adaptee's `max_k`,
/// and values of the adaptee below `flux * kvalue_accuracy` are not inverted but replaced by that
/// floor.
#[derive(Clone, Debug, PartialEq)]
pub struct Deconvolve {
    adaptee: Box<Profile>,
    params: RenderParams,
    max_ksq: f64,
    min_acc_kvalue: f64,
}

impl Deconvolve {
    /// Deconvolve by a profile, using the adaptee's render parameters if it has any.
    ///
    /// Fails with [`Error::InvalidParameter`] if the adaptee has no flux to invert.
    pub fn new(adaptee: impl Into<Profile>) -> Result<Self, Error> {
        let adaptee: Profile = adaptee.into();
        let params = match &adaptee {
            Profile::Shapelet(p) => *p.params(),
            Profile::Gaussian(p) => *p.params(),
            Profile::Deconvolve(p) => p.params,
        };
        Deconvolve::with_params(adaptee, params)
    }

    pub fn with_params(adaptee: impl Into<Profile>, params: RenderParams) -> Result<Self, Error> {
        params.validate()?;
        let adaptee = Box::new(adaptee.into());

        let flux = adaptee.flux();
        if flux == 0.0 || !flux.is_finite() {
            return Err(Error::InvalidParameter("can not deconvolve a profile without flux"));
        }

        let max_k = adaptee.max_k();
        let min_acc_kvalue = flux * params.kvalue_accuracy;
        log::debug!("deconvolve: max_k = {max_k}, min_acc_kvalue = {min_acc_kvalue}");

        Ok(Deconvolve {
            adaptee,
            params,
            max_ksq: max_k * max_k,
            min_acc_kvalue,
        })
    }

    pub fn adaptee(&self) -> &Profile {
        &self.adaptee
    }

    /// Invert one Fourier sample of the adaptee at wave vector `k`.
    fn invert(&self, k: Position, value: Complex64) -> Complex64 {
        if k.norm_sqr() > self.max_ksq {
            Complex64::new(0.0, 0.0)
        } else if value.norm() < self.min_acc_kvalue.abs() {
            Complex64::new(1.0 / self.min_acc_kvalue, 0.0)
        } else {
            value.inv()
        }
    }

    /// Invert the adaptee's samples already present in `view`.
    fn invert_view(
        &self,
        view: &ImageView<'_, Complex64>,
        position: impl Fn(usize, usize) -> Option<Position>,
    ) -> Result<(), Error> {
        let bounds = *view.bounds();
        let mut result = Ok(());
        view.shade(|x, y, pix| {
            match position((x - bounds.xmin) as usize, (y - bounds.ymin) as usize) {
                Some(k) => *pix = self.invert(k, *pix),
                None => {
                    result = Err(Error::InvalidParameter("coordinates do not match the grid shape"))
                }
            }
        })?;
        result
    }
}

impl SurfaceBrightness for Deconvolve {
    fn x_value(&self, _: Position) -> Result<f64, Error> {
        Err(Error::NotAnalytic("deconvolution"))
    }

    fn k_value(&self, k: Position) -> Result<Complex64, Error> {
        if k.norm_sqr() > self.max_ksq {
            return Ok(Complex64::new(0.0, 0.0));
        }

        Ok(self.invert(k, self.adaptee.k_value(k)?))
    }

    fn flux(&self) -> f64 {
        1.0 / self.adaptee.flux()
    }

    fn centroid(&self) -> Position {
        -self.adaptee.centroid()
    }

    fn max_k(&self) -> f64 {
        self.adaptee.max_k()
    }

    fn step_k(&self) -> f64 {
        self.adaptee.step_k()
    }

    fn is_axisymmetric(&self) -> bool {
        self.adaptee.is_axisymmetric()
    }

    fn has_hard_edges(&self) -> bool {
        false
    }

    fn is_analytic_x(&self) -> bool {
        false
    }

    fn fill_x(&self, _: &ImageView<'_, f64>, _: &SampleGrid) -> Result<(), Error> {
        Err(Error::NotAnalytic("deconvolution"))
    }

    fn fill_x_coords(&self, _: &ImageView<'_, f64>, _: &Coords) -> Result<(), Error> {
        Err(Error::NotAnalytic("deconvolution"))
    }

    /// Fill with the adaptee, which may use its own fast path, then invert in place.
    fn fill_k(&self, view: &ImageView<'_, Complex64>, grid: &SampleGrid) -> Result<(), Error> {
        log::debug!("deconvolve fill_k over {}", view.bounds());
        self.adaptee.fill_k(view, grid)?;
        self.invert_view(view, |i, j| Some(grid.position(i, j)))
    }

    fn fill_k_coords(&self, view: &ImageView<'_, Complex64>, coords: &Coords) -> Result<(), Error> {
        self.adaptee.fill_k_coords(view, coords)?;
        self.invert_view(view, |i, j| coords.get(i, j))
    }

    fn shoot<R: Rng + ?Sized>(&self, _: usize, _: &mut R) -> Result<PhotonArray, Error> {
        Err(Error::Unsupported("deconvolution", "photon shooting"))
    }
}

#[test]
fn inverts_a_gaussian() {
    use crate::Gaussian;

    let gaussian = Gaussian::new(1.0, 2.0).unwrap();
    let deconvolved = Deconvolve::new(gaussian.clone()).unwrap();
    assert_eq!(deconvolved.flux(), 0.5);
    assert!(!deconvolved.is_analytic_x());
    assert_eq!(
        deconvolved.x_value(Position::origin()),
        Err(Error::NotAnalytic("deconvolution"))
    );

    let k = Position::new(0.5, 1.0);
    let product = deconvolved.k_value(k).unwrap() * gaussian.k_value(k).unwrap();
    assert!((product - Complex64::new(1.0, 0.0)).norm() < 1e-12);

    // Beyond max_k everything is cut.
    let far = Position::new(deconvolved.max_k() * 1.01, 0.0);
    assert_eq!(deconvolved.k_value(far), Ok(Complex64::new(0.0, 0.0)));
}
