// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use core::fmt;
use core::ops::{Add, AddAssign};

use num_complex::Complex64;

/// A numeric sample kind that grids can hold.
///
/// All grid logic is written once against this trait. The implementations cover the kinds needed
/// by image simulation: 16 and 32 bit integers, single and double precision floats, and complex
/// doubles for Fourier space.
///
/// The `Pod` requirement permits viewing externally owned bytes as samples without a copy, see
/// [`ImageView::from_bytes_mut`](crate::ImageView::from_bytes_mut).
///
/// Sums are accumulated in the sample type itself. Integer kinds do not promote to floating point
/// and overflow follows the usual rules of integer arithmetic.
pub trait Pixel:
    Copy + Default + PartialEq + fmt::Debug + Add<Output = Self> + AddAssign + bytemuck::Pod
{
    /// The additive identity, same as `Default::default()`.
    fn zero() -> Self {
        Self::default()
    }

    /// The reciprocal, except that zero maps to zero instead of trapping or producing infinity.
    fn invert(self) -> Self;
}

macro_rules! integer_pixel {
    ($($t:ty),* $(,)?) => {
        $(
            impl Pixel for $t {
                #[inline(always)]
                fn invert(self) -> Self {
                    if self == 0 {
                        0
                    } else {
                        // Truncates towards zero, like converting the floating reciprocal.
                        1 / self
                    }
                }
            }
        )*
    };
}

macro_rules! float_pixel {
    ($($t:ty),* $(,)?) => {
        $(
            impl Pixel for $t {
                #[inline(always)]
                fn invert(self) -> Self {
                    if self == 0.0 {
                        0.0
                    } else {
                        1.0 / self
                    }
                }
            }
        )*
    };
}

integer_pixel!(i16, u16, i32, u32);
float_pixel!(f32, f64);

impl Pixel for Complex64 {
    #[inline(always)]
    fn invert(self) -> Self {
        if self.re == 0.0 && self.im == 0.0 {
            Complex64::new(0.0, 0.0)
        } else {
            // 1/z = conj(z) / |z|^2
            let norm_sqr = self.re * self.re + self.im * self.im;
            Complex64::new(self.re / norm_sqr, -self.im / norm_sqr)
        }
    }
}

#[test]
fn zero_inverts_to_zero() {
    assert_eq!(0i16.invert(), 0);
    assert_eq!(0u32.invert(), 0);
    assert_eq!(0.0f32.invert(), 0.0);
    assert_eq!(0.0f64.invert(), 0.0);
    assert_eq!(Complex64::new(0.0, 0.0).invert(), Complex64::new(0.0, 0.0));
}

#[test]
fn reciprocals() {
    assert_eq!(4.0f64.invert(), 0.25);
    assert_eq!((-1i32).invert(), -1);
    assert_eq!(2i32.invert(), 0);
    let z = Complex64::new(0.0, 2.0).invert();
    assert_eq!(z, Complex64::new(0.0, -0.5));
}
