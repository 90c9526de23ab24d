use rand::{rngs::StdRng, SeedableRng};
use rand_distr::Normal;
use sky_grid::{Bounds, ImageAlloc};
use sky_profile::noise::{add_gaussian_noise, add_noise, add_uniform_noise, apply_poisson_noise};
use sky_profile::Error;

/// Mean and variance of the pixels of `bounds`.
fn moments(image: &ImageAlloc<f64>, bounds: &Bounds) -> (f64, f64) {
    let n = bounds.area() as f64;
    let (mut sum, mut sum_sq) = (0.0, 0.0);
    image.for_each(|x, y, pix| {
        if bounds.includes(x, y) {
            sum += pix;
            sum_sq += pix * pix;
        }
    });
    let mean = sum / n;
    (mean, sum_sq / n - mean * mean)
}

#[test]
fn gaussian_noise_on_strided_view() {
    let image = ImageAlloc::with_bounds(Bounds::new(0, 299, 0, 299), 10.0).unwrap();
    let region = Bounds::new(50, 249, 20, 279);
    // Flipped, so the view walks the buffer with negative step and stride.
    let view = image.sub_image(&region).unwrap().flipped_x().flipped_y();
    assert!(view.step() < 0 && view.stride() < 0);

    let mut rng = StdRng::seed_from_u64(3);
    add_gaussian_noise(&view, 1.0, 2.0, &mut rng).unwrap();

    let (mean, variance) = moments(&image, &region);
    // 52000 samples: the mean is within 0.01 and the variance within 2% with a large margin.
    assert!((mean - 11.0).abs() < 0.05, "mean {mean}");
    assert!((variance - 4.0).abs() < 0.2, "variance {variance}");

    image.for_each(|x, y, pix| {
        if !region.includes(x, y) {
            assert_eq!(pix, 10.0, "touched outside of the view at {x},{y}");
        }
    });
}

#[test]
fn uniform_noise_stays_in_range() {
    let image = ImageAlloc::new(64, 64, 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    add_uniform_noise(&image.view(), -0.5, 0.5, &mut rng).unwrap();

    let (mean, variance) = moments(&image, &Bounds::new(1, 64, 1, 64));
    image.for_each(|_, _, pix| assert!((-0.5..0.5).contains(&pix)));
    assert!(mean.abs() < 0.03, "mean {mean}");
    assert!((variance - 1.0 / 12.0).abs() < 0.01, "variance {variance}");

    assert!(matches!(
        add_uniform_noise(&image.view(), 1.0, 1.0, &mut rng),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn any_distribution_of_the_pixel_type() {
    let image = ImageAlloc::new(8, 8, 0.0f32).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let normal = Normal::new(100.0f32, 1e-3).unwrap();
    add_noise(&image.view(), &normal, &mut rng).unwrap();
    image.for_each(|_, _, pix| assert!((pix - 100.0).abs() < 0.1));
}

#[test]
fn poisson_noise_keeps_counts() {
    let image = ImageAlloc::with_bounds(Bounds::new(0, 199, 0, 199), 50.0).unwrap();
    image.set_value(0, 0, 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    apply_poisson_noise(&image.view(), &mut rng).unwrap();

    assert_eq!(image.at(0, 0), Ok(0.0));
    image.for_each(|_, _, pix| assert_eq!(pix, pix.round()));
    let (mean, variance) = moments(&image, &Bounds::new(0, 199, 1, 199));
    assert!((mean - 50.0).abs() < 0.3, "mean {mean}");
    assert!((variance - 50.0).abs() < 3.0, "variance {variance}");
}

#[test]
fn invalid_noise_parameters() {
    let image = ImageAlloc::new(2, 2, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(add_gaussian_noise(&image.view(), 0.0, -1.0, &mut rng).is_err());
    assert_eq!(image.sum_elements(), Ok(4.0));

    let undefined = ImageAlloc::<f64>::empty();
    assert_eq!(
        add_gaussian_noise(&undefined.view(), 0.0, 1.0, &mut rng),
        Err(Error::Grid(sky_grid::Error::Undefined))
    );
}
