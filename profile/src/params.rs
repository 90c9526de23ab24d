// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use crate::Error;

/// Accuracy settings shared by all profiles.
///
/// Every threshold is a fraction of the total flux and must lie strictly between zero and one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderParams {
    /// Fraction of flux allowed to fold back into the image from outside a real space period.
    ///
    /// Determines [`step_k`](crate::SurfaceBrightness::step_k).
    pub folding_threshold: f64,
    /// Fourier amplitude, relative to the flux, below which a profile is treated as zero.
    ///
    /// Determines [`max_k`](crate::SurfaceBrightness::max_k).
    pub maxk_threshold: f64,
    /// Fourier amplitude, relative to the flux, below which values are not considered accurate.
    pub kvalue_accuracy: f64,
}

impl RenderParams {
    /// Validate a set of thresholds.
    pub fn new(
        folding_threshold: f64,
        maxk_threshold: f64,
        kvalue_accuracy: f64,
    ) -> Result<Self, Error> {
        let params = RenderParams {
            folding_threshold,
            maxk_threshold,
            kvalue_accuracy,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the thresholds, for example after deserializing or modifying the fields.
    pub fn validate(&self) -> Result<(), Error> {
        let fraction = |value: f64| value > 0.0 && value < 1.0;

        if !fraction(self.folding_threshold) {
            return Err(Error::InvalidParameter("folding threshold must be in (0, 1)"));
        }

        if !fraction(self.maxk_threshold) {
            return Err(Error::InvalidParameter("maxk threshold must be in (0, 1)"));
        }

        if !fraction(self.kvalue_accuracy) {
            return Err(Error::InvalidParameter("kvalue accuracy must be in (0, 1)"));
        }

        Ok(())
    }

    /// `sqrt(-2 ln(folding_threshold))`, the real space extent of a unit Gaussian to include.
    pub(crate) fn folding_radius(&self) -> f64 {
        libm::sqrt(-2.0 * libm::log(self.folding_threshold))
    }

    /// `sqrt(-2 ln(maxk_threshold))`, the Fourier extent of a unit Gaussian to include.
    pub(crate) fn maxk_radius(&self) -> f64 {
        libm::sqrt(-2.0 * libm::log(self.maxk_threshold))
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            folding_threshold: 5e-3,
            maxk_threshold: 1e-3,
            kvalue_accuracy: 1e-5,
        }
    }
}

#[test]
fn thresholds_are_fractions() {
    assert!(RenderParams::default().validate().is_ok());
    assert!(RenderParams::new(0.01, 1e-4, 1e-6).is_ok());
    assert!(matches!(
        RenderParams::new(0.0, 1e-3, 1e-5),
        Err(Error::InvalidParameter(_))
    ));
    assert!(RenderParams::new(5e-3, 1.0, 1e-5).is_err());
    assert!(RenderParams::new(5e-3, 1e-3, f64::NAN).is_err());
}
